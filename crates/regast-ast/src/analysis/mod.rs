//! Properties pass.
//!
//! Runs once after the producer finished building the tree:
//! - `conditions`: registers condition groups, later validates their scope
//! - `props`: path bounds, dead marking, anchors, quantifier indices
//! - `empty`: may-match-empty flags
//! - `collect`: aggregate `RegexProperties` from live nodes

mod collect;
mod conditions;
mod empty;
mod props;

#[cfg(test)]
mod collect_tests;
#[cfg(test)]
mod conditions_tests;

use tracing::debug;

use crate::ast::RegexAst;
use crate::invariants;
use crate::nodes::{NodeId, NodeKind};

impl RegexAst {
    /// Run the properties pass. Must be called exactly once, after the tree
    /// is complete and before predicates or prefix synthesis.
    pub fn calc_properties(&mut self) {
        invariants::assert_properties_pending(self.properties_calculated);
        let root = self.root();
        debug!(nodes = self.nodes.len(), root = ?root, "properties pass start");

        conditions::register_condition_groups(self);
        let sites = props::run(self);
        empty::run(self);
        conditions::validate(self, &sites);
        collect::run(self);

        self.properties_calculated = true;
        debug!(
            quantifiers = self.quantifiers.len(),
            zero_width = self.zero_width_quantifiables.len(),
            dead = self.nodes.iter().filter(|n| n.is_dead()).count(),
            "properties pass done"
        );
    }
}

/// Length of a look-around body made of one alternative of unquantified
/// character classes, or `None` if the body is anything else.
pub(crate) fn literal_length(ast: &RegexAst, body: NodeId) -> Option<u32> {
    let group = ast.node(body).kind.as_group()?;
    let [alternative] = group.alternatives() else {
        return None;
    };
    let terms = ast.node(*alternative).kind.as_sequence()?.terms();
    let literal = terms.iter().all(|&t| {
        let node = ast.node(t);
        !node.has_quantifier() && matches!(node.kind, NodeKind::CharacterClass(_))
    });
    literal.then_some(terms.len() as u32)
}
