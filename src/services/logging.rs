//! tracing subscriber setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter directive for a `-v` count when `RUST_LOG` is unset
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// The interactive picker owns the terminal, so with `interactive` set the
/// fmt layer only emits when `RUST_LOG` asks for it explicitly.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_logging(verbosity: u8, interactive: bool) {
    let from_env = EnvFilter::try_from_default_env().ok();
    let explicit = from_env.is_some();

    let env_filter = from_env.unwrap_or_else(|| {
        if interactive {
            EnvFilter::new("off")
        } else {
            EnvFilter::new(default_directive(verbosity))
        }
    });

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!interactive)
                .with_target(explicit)
                .with_filter(env_filter),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "debug");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(0, false);
        init_logging(2, true);
    }
}
