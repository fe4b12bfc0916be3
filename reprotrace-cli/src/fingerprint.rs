use reprotrace_core::EnvironmentFingerprint;

const UNKNOWN: &str = "unknown";

pub fn capture() -> EnvironmentFingerprint {
    EnvironmentFingerprint {
        runtime_version: option_env!("REPROTRACE_RUSTC_VERSION")
            .unwrap_or(UNKNOWN)
            .to_string(),
        platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
        host_name: host_name(),
        service_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

fn host_name() -> String {
    ["HOSTNAME", "COMPUTERNAME"]
        .iter()
        .find_map(|name| std::env::var(name).ok())
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
