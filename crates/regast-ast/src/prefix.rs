//! Look-behind prefix synthesis.
//!
//! A forward automaton can only evaluate a look-behind if it has seen the
//! characters before the match start. When every look-behind is a literal,
//! the look-back distance is bounded by the root's `prefix_length_max`, and
//! the root is wrapped as
//!
//! ```text
//! [any × N] [O_N] [root]      O_0 = ()      O_k = (any O_(k-1) | )
//! ```
//!
//! The optional layers let a match start at any offset `0..=N` into the
//! prefix. Sticky matching starts exactly at the search offset, so the
//! layers are left out.

use tracing::debug;

use crate::ast::RegexAst;
use crate::invariants;
use crate::nodes::NodeId;
use crate::{Error, Result, UnsupportedFeature};

use regast_core::CodePointSet;

impl RegexAst {
    /// Wrap the root in a synthesized prefix if some look-behind needs it.
    pub fn create_prefix(&mut self) -> Result<()> {
        invariants::assert_properties_calculated(self.properties_calculated);
        invariants::assert_prefix_not_created(self.wrapped_root.is_some());
        let root = self.root();
        if self.node(root).starts_with_caret() {
            debug!("root starts with caret, no prefix needed");
            return Ok(());
        }
        if self.properties.non_literal_look_behind_assertions {
            return Err(Error::Unsupported(UnsupportedFeature::NonLiteralLookBehind));
        }
        let length = self.node(root).prefix_length_max;
        if length == 0 {
            return Ok(());
        }

        let wrapper = self.create_group()?;
        let seq = self.add_sequence(wrapper)?;
        for offset in 0..length {
            let any = self.create_prefix_any(offset)?;
            self.add_term(seq, any)?;
        }
        let sticky = self.options.flags.sticky;
        if !sticky {
            let layers = self.create_optional_layers(length)?;
            self.add_term(seq, layers)?;
        }
        self.add_term(seq, root)?;

        let root_flags = self.node(root).flags;
        for id in [wrapper, seq] {
            let node = self.node_mut(id);
            node.inherit(root_flags);
            node.set_prefix(true);
            node.set_may_match_empty_string(false);
        }
        self.set_body(self.root_node, wrapper);
        self.wrapped_root = Some(wrapper);
        self.wrapped_prefix_length = length;
        self.prefix_hidden = false;
        debug!(length, sticky, "prefix synthesized");
        Ok(())
    }

    fn create_prefix_any(&mut self, offset: u32) -> Result<NodeId> {
        let any = self.create_character_class(CodePointSet::full())?;
        let node = self.node_mut(any);
        node.set_prefix(true);
        node.min_path = offset + 1;
        node.max_path = offset + 1;
        Ok(any)
    }

    /// Build `O_depth`, innermost layer first.
    fn create_optional_layers(&mut self, depth: u32) -> Result<NodeId> {
        let mut layer = self.create_group()?;
        self.add_sequence(layer)?;
        self.mark_optional_layer(layer);
        for _ in 0..depth {
            let outer = self.create_group()?;
            let consume = self.add_sequence(outer)?;
            let any = self.create_character_class(CodePointSet::full())?;
            self.node_mut(any).set_prefix(true);
            self.add_term(consume, any)?;
            self.add_term(consume, layer)?;
            self.add_sequence(outer)?;
            self.mark_optional_layer(outer);
            layer = outer;
        }
        Ok(layer)
    }

    fn mark_optional_layer(&mut self, group: NodeId) {
        for id in std::iter::once(group).chain(self.group(group).alternatives().to_vec()) {
            let node = self.node_mut(id);
            node.set_prefix(true);
            node.set_may_match_empty_string(true);
        }
    }

    /// Make the original root the root node's body again.
    pub fn hide_prefix(&mut self) {
        if self.wrapped_root.is_none() || self.prefix_hidden {
            return;
        }
        let root = self.root();
        self.set_body(self.root_node, root);
        self.prefix_hidden = true;
    }

    /// Make the prefix wrapper the root node's body again.
    pub fn unhide_prefix(&mut self) {
        let Some(wrapper) = self.wrapped_root else {
            return;
        };
        if !self.prefix_hidden {
            return;
        }
        let root = self.root();
        self.set_body(self.root_node, wrapper);
        let seq = self.group(wrapper).alternatives()[0];
        self.node_mut(root).parent = Some(seq);
        self.prefix_hidden = false;
    }

    #[inline]
    pub fn is_prefix_hidden(&self) -> bool {
        self.prefix_hidden
    }

    /// Mandatory prefix length; zero without a wrapper.
    #[inline]
    pub fn wrapped_prefix_length(&self) -> u32 {
        self.wrapped_prefix_length
    }

    /// The group the automaton starts from.
    pub fn effective_root(&self) -> NodeId {
        match self.wrapped_root {
            Some(wrapper) if !self.prefix_hidden => wrapper,
            _ => self.root(),
        }
    }

    /// Entry point after `offset` prefix characters were consumed.
    pub fn entry_after_prefix(&self, offset: u32) -> NodeId {
        match self.wrapped_root {
            Some(wrapper) if !self.prefix_hidden => {
                let seq = self.group(wrapper).alternatives()[0];
                let terms = self.sequence(seq).terms();
                terms[(offset as usize).min(terms.len() - 1)]
            }
            _ => self.root(),
        }
    }
}
