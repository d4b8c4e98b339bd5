//! Layer builders for picker configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PickerConfig;

/// Source a test value is loaded from, lowest precedence first.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

impl Layer {
    fn push(self, composer: &mut MergeComposer, value: Value) {
        match self {
            Self::Defaults => composer.push_defaults(value),
            Self::File => composer.push_file(value, None),
            Self::Environment => composer.push_environment(value),
            Self::Cli => composer.push_cli(value),
        }
    }
}

/// Merges `layers` in order into a [`PickerConfig`].
pub fn picker_config(layers: &[(Layer, Value)]) -> PickerConfig {
    let mut composer = MergeComposer::new();
    for (layer, value) in layers {
        layer.push(&mut composer, value.clone());
    }
    PickerConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}
