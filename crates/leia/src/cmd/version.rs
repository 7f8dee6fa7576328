use leia_refresher::RefresherConfig;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("leia {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    for (key, value) in provenance() {
        println!("{key}: {value}");
    }
    Ok(SUCCESS)
}

/// Build provenance plus the defaults a deployment inherits when it
/// configures nothing.
fn provenance() -> Vec<(&'static str, String)> {
    let refresher = RefresherConfig::default();
    let mut lines = vec![
        ("name", "leia".to_string()),
        ("version", env!("CARGO_PKG_VERSION").to_string()),
        (
            "build_target",
            option_env!("LEIA_BUILD_TARGET").unwrap_or("unknown").to_string(),
        ),
        (
            "build_profile",
            option_env!("LEIA_BUILD_PROFILE").unwrap_or("unknown").to_string(),
        ),
        ("features", format!("http={}, cli=true", cfg!(feature = "http"))),
        (
            "refresher_interval",
            format!("{}s", refresher.interval.as_secs()),
        ),
    ];
    #[cfg(feature = "http")]
    {
        let backend = leia_processor::http::HttpBackendConfig::default();
        lines.push((
            "http_backend_default",
            format!(
                "{}:{}{} retries={} timeout={}ms",
                backend.host, backend.port, backend.uri, backend.retry_count, backend.timeout_ms
            ),
        ));
    }
    lines
}
