//! Tree-dump style debug printing.

use crate::types::Node;

/// Renders one child given the indentation prefix of its line.
pub type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Prints `children` below the current line using box-drawing branches.
///
/// Trailing `None` children are dropped; empty child output renders as a
/// bare `│` connector.
pub fn print_tree(tab: &str, children: &[Option<&PrintChild>]) -> String {
    let mut out = String::new();
    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child) in children.iter().enumerate().take(last + 1) {
        let Some(child) = child else {
            continue;
        };
        let is_last = i == last;
        let child_tab = format!("{tab}{}  ", if is_last { " " } else { "│" });
        let rendered = child(&child_tab);
        let branch = if rendered.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !rendered.is_empty() {
            out.push(' ');
            out.push_str(&rendered);
        }
    }

    out
}

/// Prints a binary arena tree, labelling each node with `label`.
///
/// A node with one child still prints both slots, the missing one as `∅`,
/// so left and right stay distinguishable.
pub fn print_binary<N, F>(arena: &[N], node: Option<u32>, tab: &str, label: &F) -> String
where
    N: Node,
    F: Fn(u32, &N) -> String,
{
    let Some(i) = node else {
        return "∅".to_string();
    };
    let n = &arena[i as usize];
    let (l, r) = (n.l(), n.r());
    if l.is_none() && r.is_none() {
        return label(i, n);
    }
    let left = |tab: &str| format!("L {}", print_binary(arena, l, tab, label));
    let right = |tab: &str| format!("R {}", print_binary(arena, r, tab, label));
    format!("{}{}", label(i, n), print_tree(tab, &[Some(&left), Some(&right)]))
}
