use shufflecheck_core::{HarnessConfig, SourceConfig};

/// Print the stdin script a `run` would feed the subject.
pub fn run(config_path: Option<&str>, source: Option<&str>, iterations: Option<usize>) {
    let mut config = match config_path {
        Some(path) => HarnessConfig::load(path).unwrap_or_else(|e| super::fail(e)),
        None => HarnessConfig::default(),
    };
    if let Some(n) = iterations {
        config.iterations = n;
    }
    let chosen = pick_source(&config, source).unwrap_or_else(|| {
        super::fail(format!("unknown source '{}'", source.unwrap_or_default()))
    });
    let mut chosen = chosen.clone();
    if iterations.is_some() {
        chosen.iterations = None;
    }
    print!("{}", config.script(&chosen));
}

fn pick_source<'a>(config: &'a HarnessConfig, label: Option<&str>) -> Option<&'a SourceConfig> {
    match label {
        None => config.sources.first(),
        Some(l) => config.sources.iter().find(|s| s.label.eq_ignore_ascii_case(l)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_source() {
        let config = HarnessConfig::default();
        assert_eq!(pick_source(&config, None).unwrap().label, "/dev/urandom");
        assert_eq!(pick_source(&config, Some("XORSHIFT")).unwrap().label, "xorshift");
        assert!(pick_source(&config, Some("nope")).is_none());
    }
}
