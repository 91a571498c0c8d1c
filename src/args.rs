//! Role-argument derivation for the streaming invocation (pure)

use crate::job::JobCapabilities;

/// Line-continuation separator between derived clauses.
const CONTINUATION: &str = " \\\n";

/// The framework arguments wiring the job's roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleArguments {
    /// Verbatim block from the job's override file, not validated.
    Override(String),
    /// Derived clause list, in grammar order.
    Clauses(Vec<String>),
}

impl RoleArguments {
    /// Render the block spliced into the launcher template.
    ///
    /// Derived clauses get a trailing continuation so the invocation
    /// line keeps going into the input flags; an override block is
    /// the author's responsibility and is spliced untouched.
    pub fn render(&self) -> String {
        match self {
            RoleArguments::Override(block) => block.clone(),
            RoleArguments::Clauses(clauses) => {
                format!("{} \\", clauses.join(CONTINUATION))
            }
        }
    }
}

/// Derive the role arguments for `artifact` from detected
/// capabilities.
///
/// The reducer position is decided first: a missing reducer becomes
/// the zero-reduce-tasks configuration option, and configuration
/// options must precede role options in the streaming-jar grammar.
/// The mapper clause is always emitted, last.
pub fn derive_role_arguments(caps: &JobCapabilities, artifact: &str) -> RoleArguments {
    if let Some(block) = &caps.override_args {
        return RoleArguments::Override(block.clone());
    }
    let mut clauses = Vec::new();
    if caps.has_reducer {
        clauses.push(role_clause("reducer", artifact));
    } else {
        clauses.push("-D mapred.reduce.tasks=0".to_string());
    }
    if caps.has_combiner {
        clauses.push(role_clause("combiner", artifact));
    }
    clauses.push(role_clause("mapper", artifact));
    RoleArguments::Clauses(clauses)
}

/// Invocation clause running one role out of the packaged artifact.
fn role_clause(role: &str, artifact: &str) -> String {
    format!("-{role} 'php -d detect_unicode=off {artifact} {role}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(has_reducer: bool, has_combiner: bool) -> JobCapabilities {
        JobCapabilities {
            has_reducer,
            has_combiner,
            override_args: None,
        }
    }

    #[test]
    fn test_mapper_only_job_gets_zero_reduce_tasks_first() {
        let derived = derive_role_arguments(&caps(false, false), "myjob.phar");
        assert_eq!(
            derived,
            RoleArguments::Clauses(vec![
                "-D mapred.reduce.tasks=0".to_string(),
                "-mapper 'php -d detect_unicode=off myjob.phar mapper'".to_string(),
            ])
        );
    }

    #[test]
    fn test_reducer_clause_precedes_mapper_clause() {
        let derived = derive_role_arguments(&caps(true, false), "myjob.phar");
        let RoleArguments::Clauses(clauses) = derived else {
            panic!("expected derived clauses");
        };
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0],
            "-reducer 'php -d detect_unicode=off myjob.phar reducer'"
        );
        assert_eq!(
            clauses[1],
            "-mapper 'php -d detect_unicode=off myjob.phar mapper'"
        );
        assert!(!clauses.iter().any(|c| c.contains("mapred.reduce.tasks")));
    }

    #[test]
    fn test_combiner_sits_between_reducer_and_mapper() {
        let derived = derive_role_arguments(&caps(true, true), "myjob.phar");
        let RoleArguments::Clauses(clauses) = derived else {
            panic!("expected derived clauses");
        };
        assert_eq!(clauses.len(), 3);
        assert!(clauses[0].starts_with("-reducer "));
        assert!(clauses[1].starts_with("-combiner "));
        assert!(clauses[2].starts_with("-mapper "));
    }

    #[test]
    fn test_combiner_without_reducer_keeps_config_clause_first() {
        let derived = derive_role_arguments(&caps(false, true), "myjob.phar");
        let RoleArguments::Clauses(clauses) = derived else {
            panic!("expected derived clauses");
        };
        assert_eq!(clauses[0], "-D mapred.reduce.tasks=0");
        assert!(clauses[1].starts_with("-combiner "));
        assert!(clauses[2].starts_with("-mapper "));
    }

    #[test]
    fn test_override_wins_over_entry_files() {
        let capabilities = JobCapabilities {
            has_reducer: true,
            has_combiner: true,
            override_args: Some("-foo bar".to_string()),
        };
        let derived = derive_role_arguments(&capabilities, "myjob.phar");
        assert_eq!(derived, RoleArguments::Override("-foo bar".to_string()));
        assert_eq!(derived.render(), "-foo bar");
    }

    #[test]
    fn test_rendered_clauses_join_with_continuations() {
        let derived = derive_role_arguments(&caps(false, false), "myjob.phar");
        assert_eq!(
            derived.render(),
            "-D mapred.reduce.tasks=0 \\\n\
             -mapper 'php -d detect_unicode=off myjob.phar mapper' \\"
        );
    }
}
