use std::env;

use super::ServerConfig;
use super::utils::{non_empty, parse_port};
use super::validation::validate_output_format;
use super::yaml::YamlConfig;
use super::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_VOICE, DEFAULT_VOICES_LOCALE};
use crate::core::tts::edge::{EDGE_TTS_URL, EDGE_VOICES_URL, OutputFormat};

/// Merge YAML configuration with environment variables
///
/// Priority order (highest to lowest):
/// 1. YAML configuration values
/// 2. Environment variables
/// 3. Default values
///
/// Blank environment variables are treated as unset.
pub fn merge_config(
    yaml_config: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml_config.unwrap_or_default();
    let tts = yaml.tts.unwrap_or_default();

    // Helper macro to get value with priority: YAML > ENV > Default
    macro_rules! get_value {
        ($env_var:expr, $yaml_value:expr, $default:expr) => {
            $yaml_value
                .or_else(|| non_empty(env::var($env_var).ok()))
                .unwrap_or_else(|| $default.to_string())
        };
    }

    // Helper macro for optional values: YAML > ENV
    macro_rules! get_optional {
        ($env_var:expr, $yaml_value:expr) => {
            $yaml_value.or_else(|| non_empty(env::var($env_var).ok()))
        };
    }

    // Server configuration
    let host = get_value!(
        "HOST",
        yaml.server.as_ref().and_then(|s| s.host.clone()),
        DEFAULT_HOST
    );

    let port = if let Some(yaml_port) = yaml.server.as_ref().and_then(|s| s.port) {
        yaml_port
    } else if let Some(port_str) = non_empty(env::var("PORT").ok()) {
        parse_port(&port_str).map_err(|e| format!("Invalid PORT environment variable: {e}"))?
    } else {
        DEFAULT_PORT
    };

    // Synthesis defaults
    let default_voice = get_value!("TTS_DEFAULT_VOICE", tts.default_voice, DEFAULT_VOICE);

    let output_format = match get_optional!("TTS_OUTPUT_FORMAT", tts.output_format) {
        Some(value) => validate_output_format(&value)?,
        None => OutputFormat::default(),
    };

    let voices_locale = get_value!("TTS_VOICES_LOCALE", tts.voices_locale, DEFAULT_VOICES_LOCALE);

    // Service endpoints
    let synthesis_url = get_value!("TTS_SYNTHESIS_URL", tts.synthesis_url, EDGE_TTS_URL);
    let voices_url = get_value!("TTS_VOICES_URL", tts.voices_url, EDGE_VOICES_URL);

    Ok(ServerConfig {
        host,
        port,
        default_voice,
        output_format,
        voices_locale,
        synthesis_url,
        voices_url,
    })
}

#[cfg(test)]
mod tests {
    use super::super::yaml::{ServerYaml, TtsYaml};
    use super::*;
    use serial_test::serial;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            env::remove_var("HOST");
            env::remove_var("PORT");
            env::remove_var("TTS_DEFAULT_VOICE");
            env::remove_var("TTS_OUTPUT_FORMAT");
            env::remove_var("TTS_VOICES_LOCALE");
            env::remove_var("TTS_SYNTHESIS_URL");
            env::remove_var("TTS_VOICES_URL");
        }
    }

    #[test]
    #[serial]
    fn test_merge_defaults_when_no_yaml_or_env() {
        cleanup_env_vars();

        let config = merge_config(None).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3001);
        assert_eq!(config.default_voice, "en-US-ChristopherNeural");
        assert_eq!(config.output_format, OutputFormat::Audio24Khz96KbitrateMonoMp3);
    }

    #[test]
    #[serial]
    fn test_merge_yaml_only() {
        cleanup_env_vars();

        let yaml = YamlConfig {
            server: Some(ServerYaml {
                host: Some("localhost".to_string()),
                port: Some(8080),
            }),
            tts: Some(TtsYaml {
                default_voice: Some("it-IT-ElsaNeural".to_string()),
                output_format: Some("raw-16khz-16bit-mono-pcm".to_string()),
                ..Default::default()
            }),
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_voice, "it-IT-ElsaNeural");
        assert_eq!(config.output_format, OutputFormat::Raw16Khz16BitMonoPcm);
        assert_eq!(config.voices_locale, "en-US");
    }

    #[test]
    #[serial]
    fn test_merge_yaml_overrides_env() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "9000");
            env::set_var("TTS_DEFAULT_VOICE", "es-ES-ElviraNeural");
            env::set_var("TTS_VOICES_LOCALE", "es-ES");
        }

        let yaml = YamlConfig {
            server: Some(ServerYaml {
                host: None,
                port: Some(7000),
            }),
            tts: Some(TtsYaml {
                default_voice: Some("pt-BR-FranciscaNeural".to_string()),
                ..Default::default()
            }),
        };

        let config = merge_config(Some(yaml)).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.default_voice, "pt-BR-FranciscaNeural");
        assert_eq!(config.voices_locale, "es-ES");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_env_only() {
        cleanup_env_vars();

        unsafe {
            env::set_var("HOST", "127.0.0.1");
            env::set_var("PORT", "4100");
            env::set_var("TTS_OUTPUT_FORMAT", "ogg-48khz-16bit-mono-opus");
            env::set_var("TTS_SYNTHESIS_URL", "ws://127.0.0.1:9001/edge");
            env::set_var("TTS_VOICES_URL", "http://127.0.0.1:9001/voices");
        }

        let config = merge_config(None).unwrap();
        assert_eq!(config.address(), "127.0.0.1:4100");
        assert_eq!(config.output_format, OutputFormat::Ogg48Khz16BitMonoOpus);
        assert_eq!(config.synthesis_url, "ws://127.0.0.1:9001/edge");
        assert_eq!(config.voices_url, "http://127.0.0.1:9001/voices");

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_blank_env_uses_default() {
        cleanup_env_vars();

        unsafe {
            env::set_var("TTS_DEFAULT_VOICE", "");
            env::set_var("PORT", " ");
        }

        let config = merge_config(None).unwrap();
        assert_eq!(config.default_voice, "en-US-ChristopherNeural");
        assert_eq!(config.port, 3001);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_invalid_port_env() {
        cleanup_env_vars();

        unsafe {
            env::set_var("PORT", "not-a-port");
        }

        let err = merge_config(None).unwrap_err();
        assert!(err.to_string().contains("Invalid PORT environment variable"));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_merge_invalid_output_format() {
        cleanup_env_vars();

        let yaml = YamlConfig {
            tts: Some(TtsYaml {
                output_format: Some("audio-44khz-mp3".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let err = merge_config(Some(yaml)).unwrap_err();
        assert!(err.to_string().contains("audio-44khz-mp3"));
    }
}
