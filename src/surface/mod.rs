//! Entry points for agent hosts.
//!
//! - `tool`: an on-demand `ts_check` tool taking paths or inline content
//! - `hook`: a post-write hook that checks the file an agent just wrote
//!
//! Both are thin translations onto [`crate::check::Checker`].

pub mod hook;
pub mod tool;

use crate::check::CheckKind;
use tracing::warn;

/// Parse caller-supplied check selectors, skipping unknown names.
pub(crate) fn parse_checks(names: &[String]) -> Vec<CheckKind> {
    names
        .iter()
        .filter_map(|name| {
            let kind = CheckKind::parse(name);
            if kind.is_none() {
                warn!("ignoring unknown check {:?}", name);
            }
            kind
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_checks() {
        let names = vec![
            "eslint".to_string(),
            "stubs".to_string(),
            "jshint".to_string(),
        ];
        assert_eq!(
            parse_checks(&names),
            vec![CheckKind::Eslint, CheckKind::StubCheck]
        );
    }
}
