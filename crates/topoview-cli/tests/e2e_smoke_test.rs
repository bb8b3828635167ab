use std::{fs, path::PathBuf};

use tempfile::tempdir;

use topoview::command::StatusType;
use topoview_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: Option<String>, output: &std::path::Path) -> Args {
    Args {
        input,
        output: output.to_string_lossy().to_string(),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_demos = collect_json_files(demos_dir());

    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_path = temp_dir.path().join(format!(
            "{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        let args = args_for(Some(demo_path.to_string_lossy().to_string()), &output_path);

        match run(&args) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).unwrap();
                assert!(svg.starts_with("<svg"), "{} is not SVG", output_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_json_files(demos_dir().join("errors"));

    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpected_successes = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join("error.svg");
        let args = args_for(Some(demo_path.to_string_lossy().to_string()), &output_path);

        if run(&args).is_ok() {
            unexpected_successes.push(demo_path.clone());
        }
    }

    assert!(
        unexpected_successes.is_empty(),
        "Error demos succeeded unexpectedly: {unexpected_successes:?}"
    );
}

#[test]
fn e2e_sample_without_input() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("sample.svg");

    run(&args_for(None, &output_path)).unwrap();

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("Node 17"));
    // unreachable nodes are not drawn
    assert!(!svg.contains("Node 21"));
}

#[test]
fn e2e_interactions() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("interactions.svg");

    let args = Args {
        collapse: vec!["6".to_string()],
        zoom: Some(1.5),
        pan_x: -20.0,
        apply: vec![StatusType::ControlPoint],
        ..args_for(None, &output_path)
    };
    run(&args).unwrap();

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("data-layer=\"assistant\""));
    assert!(svg.contains("scale(1.5)"));
    assert!(!svg.contains("Node 17"));
}

#[test]
fn e2e_undo_and_reset() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("undo.svg");

    let args = Args {
        apply: vec![StatusType::Aggregated, StatusType::ControlPoint],
        undo: 1,
        ..args_for(None, &output_path)
    };
    run(&args).unwrap();
    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(!svg.contains("data-layer=\"assistant\""));
    assert!(!svg.contains("Node 17"));

    let args = Args {
        apply: vec![StatusType::Aggregated, StatusType::ControlPoint],
        reset: true,
        ..args_for(None, &output_path)
    };
    run(&args).unwrap();
    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(!svg.contains("data-layer=\"assistant\""));
    assert!(svg.contains("Node 17"));
}

#[test]
fn e2e_unknown_collapse_target() {
    let temp_dir = tempdir().unwrap();
    let output_path = temp_dir.path().join("unknown.svg");

    let args = Args {
        collapse: vec!["21".to_string()],
        ..args_for(None, &output_path)
    };
    let err = run(&args).unwrap_err();

    assert!(matches!(err, topoview::TopoviewError::Topology(_)));
}

#[test]
fn e2e_config_overrides_grouping() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[view]\ngrouping = \"aggregated\"\n").unwrap();
    let output_path = temp_dir.path().join("config.svg");

    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        ..args_for(None, &output_path)
    };
    run(&args).unwrap();

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(!svg.contains("Node 17"));
}
