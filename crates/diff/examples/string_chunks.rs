use anyhow::Result;
use cell_diff::{diff, create_patch_string_diff_model, DiffConfig, DiffModel};
use serde_json::json;

fn main() -> Result<()> {
    env_logger::init();

    // Two versions of a cell's source
    let base = json!("import numpy as np\n\nx = np.arange(10)\nprint(x)\n");
    let remote = json!("import numpy as np\nimport pandas as pd\n\nx = np.arange(20)\nprint(x)\n");

    let config = DiffConfig::default();
    let entries = diff(&base, &remote, &config)?;
    println!("Diff entries:");
    println!("{}", serde_json::to_string_pretty(&entries)?);

    let model = create_patch_string_diff_model(&base, &entries, &config)?;
    let chunks = model.get_chunks();
    println!("\nUnchanged: {}", model.unchanged());
    println!("Chunks: {}", chunks.len());

    let base_lines: Vec<&str> = model.base().unwrap_or_default().lines().collect();
    let remote_lines: Vec<&str> = model.remote().unwrap_or_default().lines().collect();

    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "Chunk {}: base lines {:?}, remote lines {:?}",
            i + 1,
            chunk.orig_range(),
            chunk.edit_range()
        );
        for line in chunk.orig_range().filter_map(|line| base_lines.get(line)) {
            println!("  \x1b[31m- {}\x1b[0m", line);
        }
        for line in chunk.edit_range().filter_map(|line| remote_lines.get(line)) {
            println!("  \x1b[32m+ {}\x1b[0m", line);
        }
    }

    Ok(())
}
