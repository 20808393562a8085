use globset::Glob;

/// Resolves the active environment name.
///
/// A console `--env=<name>` (or `--env <name>`) argument takes precedence;
/// otherwise the caller's callback decides, typically by reading `APP_ENV`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentDetector;

impl EnvironmentDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect the environment from `console_args`, falling back to `callback`.
    pub fn detect<F>(&self, callback: F, console_args: Option<&[String]>) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(env) = console_args.and_then(Self::console_environment) {
            log::debug!("Environment '{}' taken from console arguments", env);
            return env;
        }
        callback()
    }

    /// The value of the first `--env` argument, if any.
    pub fn console_environment(args: &[String]) -> Option<String> {
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(value) = arg.strip_prefix("--env=") {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            } else if arg == "--env" {
                return iter.next().filter(|v| !v.starts_with("--")).cloned();
            }
        }
        None
    }

    /// Whether `environment` matches any of the glob `patterns`.
    ///
    /// Patterns that fail to compile are logged and treated as non-matching.
    pub fn matches_any<I, S>(environment: &str, patterns: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        patterns
            .into_iter()
            .any(|pattern| match Glob::new(pattern.as_ref()) {
                Ok(glob) => glob.compile_matcher().is_match(environment),
                Err(e) => {
                    log::warn!("Ignoring invalid environment pattern '{}': {}", pattern.as_ref(), e);
                    false
                }
            })
    }
}
