// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置设置测试模块
///
/// 测试默认值、配置文件与环境变量的加载

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;
    use subcrawl::config::settings::{Settings, DEFAULT_USER_AGENT};

    // Settings loading reads the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_config_defaults() {
        let _env = env_lock();
        let settings = Settings::load(None).expect("defaults should load");

        assert_eq!(settings.crawl.max_sessions, 50);
        assert_eq!(settings.crawl.session_timeout(), Duration::from_secs(30));
        assert_eq!(settings.crawl.concurrent_requests, 3);
        assert_eq!(settings.crawl.concurrent_requests_per_domain, 3);
        assert_eq!(settings.crawl.request_delay(), Duration::from_millis(250));
        assert!(settings.crawl.randomize_delay);
        assert_eq!(settings.crawl.max_depth, 2);
        assert_eq!(settings.crawl.user_agent, DEFAULT_USER_AGENT);
        assert!(!settings.metrics.enabled);
    }

    #[test]
    fn test_config_loading_from_file() {
        let _env = env_lock();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[crawl]
max_sessions = 8
session_timeout_secs = 5
max_depth = 1

[scope]
domains = ["example.com", "example.org"]
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).expect("file should load");

        assert_eq!(settings.crawl.max_sessions, 8);
        assert_eq!(settings.crawl.session_timeout_secs, 5);
        assert_eq!(settings.crawl.max_depth, 1);
        // Unset keys keep their defaults
        assert_eq!(settings.crawl.request_timeout_secs, 10);
        assert_eq!(settings.scope.domains, vec!["example.com", "example.org"]);
    }

    #[test]
    fn test_config_missing_file_is_an_error() {
        let _env = env_lock();
        let result = Settings::load(Some(std::path::Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_environment_overrides() {
        let _env = env_lock();
        std::env::set_var("SUBCRAWL__LOGGING__JSON", "true");
        std::env::set_var("SUBCRAWL__SOURCE_FILTER__SOURCES", "Wayback,Arquivo");

        let settings = Settings::load(None).expect("environment should load");

        std::env::remove_var("SUBCRAWL__LOGGING__JSON");
        std::env::remove_var("SUBCRAWL__SOURCE_FILTER__SOURCES");

        assert!(settings.logging.json);
        assert_eq!(settings.source_filter.sources, vec!["Wayback", "Arquivo"]);
    }
}
