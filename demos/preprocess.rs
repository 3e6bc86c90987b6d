//! Shuffle a tiny labelled dataset, then one-hot encode its targets.
//!
//! Run with `RUST_LOG=debug cargo run --example preprocess` to see the
//! library's trace output.

use labelprep::{Array, OneHotEncoder, PreprocessConfig, Shuffler};
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
[encoder]
num_labels = "auto"
dtype = "float32"

[shuffle]
seed = 3
"#;

fn main() -> labelprep::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PreprocessConfig::from_toml_str(CONFIG)?;
    info!(?config, "loaded preprocessing config");

    let x = Array::from_rows(vec![
        vec![5.1_f32, 3.5],
        vec![7.0, 3.2],
        vec![6.3, 3.3],
        vec![4.9, 3.0],
        vec![6.4, 3.2],
        vec![5.8, 2.7],
    ])?;
    let y = Array::from_vec(vec![0_u8, 1, 2, 0, 1, 2]);

    let (x, y) = Shuffler::from_config(&config.shuffle).shuffle_pair(&x, &y)?;
    for (row, label) in x.rows().zip(y.as_slice()) {
        info!(?row, label, "shuffled sample");
    }

    let targets = OneHotEncoder::from_config(&config.encoder).encode(y.as_slice())?;
    info!(shape = ?targets.shape(), dtype = %targets.dtype(), "encoded targets");
    if let Some(m) = targets.as_f32() {
        for row in m.rows() {
            info!(?row, "one-hot row");
        }
    }

    Ok(())
}
