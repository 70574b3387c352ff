use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

const ALL_VARS: &[&str] = &[
    "ASSESSOR_PORT",
    "ASSESSOR_BIND_ADDR",
    "ASSESSOR_CATALOG_PATH",
    "ASSESSOR_MAX_UPLOAD_BYTES",
    "ASSESSOR_MAX_CONCURRENT",
    "ASSESSOR_CORS_PERMISSIVE",
    "ASSESSOR_NLI_MODEL_PATH",
    "ASSESSOR_NLI_BATCH_SIZE",
    "ASSESSOR_NLI_DEVICE",
    "ASSESSOR_MIN_SENTENCE_CHARS",
    "ASSESSOR_RELEVANCE_THRESHOLD",
    "ASSESSOR_TOP_EVIDENCE",
    "ASSESSOR_SENTENCE_BATCH",
    "ASSESSOR_FAILURE_POLICY",
    "ASSESSOR_STRONG_SCORE",
    "ASSESSOR_HIGH_MIN_STRONG",
    "ASSESSOR_HIGH_MIN_AVG",
    "ASSESSOR_MEDIUM_MIN_STRONG",
    "ASSESSOR_MEDIUM_MIN_AVG",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_assessor_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for var in ALL_VARS {
        unsafe { env::remove_var(var) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert!(config.catalog_path.is_none());
    assert!(config.nli.model_path.is_none());
    assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    assert_eq!(config.max_concurrent_assessments, 4);
    assert!(!config.cors_permissive);
    assert_eq!(config.policy, AssessmentPolicy::default());
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_assessor_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.policy, AssessmentPolicy::default());
    assert_eq!(config.nli, NliConfig::default());
}

#[test]
#[serial]
fn test_from_env_custom_port_and_bind_addr() {
    clear_assessor_env();

    with_env_vars(
        &[("ASSESSOR_PORT", "3000"), ("ASSESSOR_BIND_ADDR", "::1")],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.port, 3000);
            assert_eq!(
                config.bind_addr,
                IpAddr::V6(std::net::Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_paths() {
    clear_assessor_env();

    with_env_vars(
        &[
            ("ASSESSOR_CATALOG_PATH", "/etc/assessor/catalog.json"),
            ("ASSESSOR_NLI_MODEL_PATH", "/models/bert-base-mnli"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(
                config.catalog_path,
                Some(PathBuf::from("/etc/assessor/catalog.json"))
            );
            assert_eq!(
                config.nli.model_path,
                Some(PathBuf::from("/models/bert-base-mnli"))
            );
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_path_is_unset() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_CATALOG_PATH", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.catalog_path.is_none());
    });
}

#[test]
#[serial]
fn test_from_env_policy_overrides() {
    clear_assessor_env();

    with_env_vars(
        &[
            ("ASSESSOR_MIN_SENTENCE_CHARS", "20"),
            ("ASSESSOR_RELEVANCE_THRESHOLD", "0.45"),
            ("ASSESSOR_TOP_EVIDENCE", "3"),
            ("ASSESSOR_SENTENCE_BATCH", "8"),
            ("ASSESSOR_FAILURE_POLICY", "skip"),
            ("ASSESSOR_STRONG_SCORE", "0.6"),
            ("ASSESSOR_HIGH_MIN_STRONG", "4"),
            ("ASSESSOR_HIGH_MIN_AVG", "0.8"),
            ("ASSESSOR_MEDIUM_MIN_STRONG", "3"),
            ("ASSESSOR_MEDIUM_MIN_AVG", "0.55"),
        ],
        || {
            let policy = Config::from_env().expect("should parse").policy;

            assert_eq!(policy.min_sentence_chars, 20);
            assert_eq!(policy.evidence.relevance_threshold, 0.45);
            assert_eq!(policy.evidence.top_n, 3);
            assert_eq!(policy.sentence_batch_size, 8);
            assert_eq!(policy.failure_policy, FailurePolicy::SkipPair);
            assert_eq!(policy.rating.strong_score, 0.6);
            assert_eq!(policy.rating.high_min_strong, 4);
            assert_eq!(policy.rating.high_min_avg, 0.8);
            assert_eq!(policy.rating.medium_min_strong, 3);
            assert_eq!(policy.rating.medium_min_avg, 0.55);
        },
    );
}

#[test]
#[serial]
fn test_from_env_server_limits() {
    clear_assessor_env();

    with_env_vars(
        &[
            ("ASSESSOR_MAX_UPLOAD_BYTES", "1048576"),
            ("ASSESSOR_MAX_CONCURRENT", "2"),
            ("ASSESSOR_CORS_PERMISSIVE", "true"),
            ("ASSESSOR_NLI_BATCH_SIZE", "16"),
            ("ASSESSOR_NLI_DEVICE", "CPU"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.max_upload_bytes, 1_048_576);
            assert_eq!(config.max_concurrent_assessments, 2);
            assert!(config.cors_permissive);
            assert_eq!(config.nli.batch_size, 16);
            assert_eq!(config.nli.device, DevicePreference::Cpu);
        },
    );
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("reserved"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("not_a_port"));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_threshold_out_of_range() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_RELEVANCE_THRESHOLD", "1.5")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "ASSESSOR_RELEVANCE_THRESHOLD",
                ..
            }
        ));
    });
}

#[test]
#[serial]
fn test_threshold_not_a_number() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_HIGH_MIN_AVG", "high")], || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("ASSESSOR_HIGH_MIN_AVG"));
    });
}

#[test]
#[serial]
fn test_zero_count_rejected() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_TOP_EVIDENCE", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("at least 1"));
    });
}

#[test]
#[serial]
fn test_unknown_failure_policy() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_FAILURE_POLICY", "retry")], || {
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("retry"));
    });
}

#[test]
#[serial]
fn test_nli_batch_size_rejected() {
    for bad in ["0", "lots"] {
        clear_assessor_env();

        with_env_vars(&[("ASSESSOR_NLI_BATCH_SIZE", bad)], || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    name: "ASSESSOR_NLI_BATCH_SIZE",
                    ..
                }
            ));
        });
    }
}

#[test]
#[serial]
fn test_cors_flag_values() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_CORS_PERMISSIVE", "off")], || {
        assert!(!Config::from_env().unwrap().cors_permissive);
    });
    with_env_vars(&[("ASSESSOR_CORS_PERMISSIVE", " YES ")], || {
        assert!(Config::from_env().unwrap().cors_permissive);
    });
    with_env_vars(&[("ASSESSOR_CORS_PERMISSIVE", "maybe")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "ASSESSOR_CORS_PERMISSIVE",
                ..
            }
        ));
    });
}

#[test]
#[serial]
fn test_unknown_device() {
    clear_assessor_env();

    with_env_vars(&[("ASSESSOR_NLI_DEVICE", "tpu")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "ASSESSOR_NLI_DEVICE",
                ..
            }
        ));
    });
}

#[test]
fn test_validate_nonexistent_catalog_path() {
    let config = Config {
        catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
        ..Default::default()
    };

    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::PathNotFound {
            setting: "ASSESSOR_CATALOG_PATH",
            ..
        }
    ));
}

#[test]
fn test_validate_catalog_path_is_directory() {
    let config = Config {
        catalog_path: Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src")),
        ..Default::default()
    };

    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::WrongPathKind {
            expected: "file",
            ..
        }
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let config = Config {
        nli: NliConfig::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
        ..Default::default()
    };

    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::WrongPathKind {
            setting: "ASSESSOR_NLI_MODEL_PATH",
            expected: "directory",
            ..
        }
    ));
}

#[test]
fn test_validate_success_with_valid_paths() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = Config {
        catalog_path: Some(manifest_dir.join("Cargo.toml")),
        nli: NliConfig::new(manifest_dir.join("src")),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_policy() {
    let mut config = Config::default();
    config.policy.rating.top_k = 0;

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("top_k"));
}

#[test]
fn test_error_messages_name_the_variable() {
    let err = ConfigError::InvalidValue {
        name: "ASSESSOR_TOP_EVIDENCE",
        value: "-1".to_string(),
        reason: "must be at least 1".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "ASSESSOR_TOP_EVIDENCE='-1' rejected: must be at least 1"
    );

    let err = ConfigError::WrongPathKind {
        setting: "ASSESSOR_CATALOG_PATH",
        path: PathBuf::from("/srv"),
        expected: "file",
    };
    assert_eq!(
        err.to_string(),
        "ASSESSOR_CATALOG_PATH points at /srv, which is not a file"
    );
}
