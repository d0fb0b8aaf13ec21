use std::collections::HashSet;

use units_repo::{Grammar, User};

/// Find a chain of references leading from `name` back to a unit already on
/// the chain, e.g. `["a", "b", "a"]`.
///
/// Resolving a unit on such a chain never terminates. Units that are missing
/// or fail to parse end the walk; resolution reports those itself.
pub fn find_cycle(grammar: &dyn Grammar, user: &dyn User, name: &str) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut on_stack = Vec::new();
    check_cycles_dfs(grammar, user, name, &mut visited, &mut on_stack)
}

fn check_cycles_dfs(
    grammar: &dyn Grammar,
    user: &dyn User,
    current: &str,
    visited: &mut HashSet<String>,
    on_stack: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(current.to_owned());
    on_stack.push(current.to_owned());

    let references = user
        .get(current)
        .and_then(|unit| grammar.parse(unit.spec().as_text()).ok())
        .map(|variable| variable.references())
        .unwrap_or_default();

    for dependency in references {
        if let Some(start) = on_stack.iter().position(|name| *name == dependency) {
            let mut cycle = on_stack[start..].to_vec();
            cycle.push(dependency);
            return Some(cycle);
        }
        if visited.contains(&dependency) {
            continue;
        }
        if let Some(cycle) = check_cycles_dfs(grammar, user, &dependency, visited, on_stack) {
            return Some(cycle);
        }
    }

    on_stack.pop();
    None
}
