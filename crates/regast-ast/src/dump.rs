//! Indented text projection of the tree, for tests and debugging.
//!
//! One line per node: label, quantifier, `min..max` path bounds, then `^`/`$`
//! for anchor domination and `✗` for dead nodes. Sentinels are omitted.

use std::fmt::Write;

use crate::ast::RegexAst;
use crate::nodes::{NodeId, NodeKind, PositionKind};

impl RegexAst {
    /// Dump everything below the root node.
    pub fn dump(&self) -> String {
        self.dump_node(self.root_node)
    }

    pub fn dump_node(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![(id, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            self.dump_line(&mut out, id, depth);
            stack.extend(self.children(id).into_iter().rev().map(|child| (child, depth + 1)));
        }
        out
    }

    fn dump_line(&self, out: &mut String, id: NodeId, depth: usize) {
        let node = self.node(id);
        write!(out, "{:indent$}{}", "", label(&node.kind), indent = depth * 2).unwrap();
        if let Some(q) = &node.quantifier {
            write!(out, "{q}").unwrap();
        }
        write!(out, " {}..{}", node.min_path, node.max_path).unwrap();
        if node.starts_with_caret() {
            out.push_str(" ^");
        }
        if node.ends_with_dollar() {
            out.push_str(" $");
        }
        if node.is_dead() {
            out.push_str(" ✗");
        }
        out.push('\n');
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Group(g) => match g.group_number {
            Some(n) => format!("Group #{n}"),
            None => "Group".to_string(),
        },
        NodeKind::ConditionalGroup(c) => format!("(?({}))", c.referenced_group),
        NodeKind::Sequence(_) => "Seq".to_string(),
        NodeKind::CharacterClass(c) => c.set.to_string(),
        NodeKind::BackReference(b) => {
            let numbers: Vec<String> = b.group_numbers.iter().map(u32::to_string).collect();
            format!("\\{}", numbers.join(","))
        }
        NodeKind::PositionAssertion(p) => match p.kind {
            PositionKind::Caret => "^",
            PositionKind::Dollar => "$",
            PositionKind::MatchBegin => "<begin>",
            PositionKind::MatchEnd => "<end>",
        }
        .to_string(),
        NodeKind::LookAhead(la) if la.negated => "(?!".to_string(),
        NodeKind::LookAhead(_) => "(?=".to_string(),
        NodeKind::LookBehind(la) if la.negated => "(?<!".to_string(),
        NodeKind::LookBehind(_) => "(?<=".to_string(),
        NodeKind::AtomicGroup(_) => "(?>".to_string(),
        NodeKind::SubexpressionCall(s) => format!("\\g<{}>", s.group_number),
        NodeKind::MatchFound(_) => "<match>".to_string(),
        NodeKind::Root(_) => "Root".to_string(),
    }
}
