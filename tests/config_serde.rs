#![cfg(feature = "serde")]

use patchgrid::{image_windows, PatchParams, Window};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PipelineConfig {
    patch: PatchParams,
    n_windows: usize,
}

#[test]
fn patch_params_parse_with_defaults() {
    let cfg: PipelineConfig =
        serde_json::from_str(r#"{ "patch": { "pwidth": 2 }, "n_windows": 4 }"#).unwrap();
    assert_eq!(cfg.patch, PatchParams::new(2, 1));
    assert_eq!(cfg.n_windows, 4);

    let cfg: PatchParams = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, PatchParams::default());
}

#[test]
fn windows_serialize_as_ranges() {
    let windows = image_windows(10, 10, 4, 0, 1).unwrap();
    let json = serde_json::to_string(&windows[1]).unwrap();
    assert_eq!(
        json,
        r#"{"rows":{"start":0,"end":5},"cols":{"start":5,"end":10}}"#
    );
    let back: Window = serde_json::from_str(&json).unwrap();
    assert_eq!(back, windows[1]);
}
