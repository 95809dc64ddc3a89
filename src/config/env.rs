use std::collections::HashMap;

/// Source of environment-style key/value settings
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Read `var` verbatim. No trimming, defaults or validation.
pub fn resolve_address(env: &impl EnvSource, var: &str) -> Option<String> {
    let value = env.var(var);
    tracing::debug!("{} = {:?}", var, value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_not_trimmed() {
        let env = HashMap::from([("PROXY_CONTRACT".to_string(), " 0xabc ".to_string())]);
        assert_eq!(resolve_address(&env, "PROXY_CONTRACT").as_deref(), Some(" 0xabc "));
    }

    #[test]
    fn test_missing_has_no_default() {
        let env = HashMap::new();
        assert_eq!(resolve_address(&env, "PROXY_CONTRACT"), None);
    }
}
