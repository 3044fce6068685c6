use anyhow::Result;
use cell_diff::{parse_diff, DiffModel, OutputDiffModel};
use serde_json::json;

fn main() -> Result<()> {
    env_logger::init();

    let base = json!({
        "output_type": "execute_result",
        "execution_count": 3,
        "metadata": {},
        "data": {
            "text/plain": "   a  b\n0  1  2\n1  3  4\n",
            "text/html": "<table>...</table>"
        }
    });

    // A diff as stored by nbdime
    let entries = parse_diff(
        r#"[
            {"op": "patch", "key": "data", "diff": [
                {"op": "patch", "key": "text/plain", "diff": [
                    {"op": "addrange", "key": 2, "valuelist": ["1  5  6\n"]},
                    {"op": "removerange", "key": 2, "length": 1}
                ]}
            ]},
            {"op": "replace", "key": "execution_count", "value": 4}
        ]"#,
    )?;

    let model = OutputDiffModel::new(Some(base), None, Some(entries))?;
    println!("Output type: {}", model.output_type()?);

    for mimetype in ["text/plain", "text/html", "image/png"] {
        match model.has_mime_type(mimetype) {
            Some(path) => {
                let content = model.stringify(Some(&path))?;
                println!(
                    "{} at `{}`: unchanged={}, chunks={:?}",
                    content.mimetype(),
                    path,
                    content.unchanged(),
                    content.get_chunks()
                );
            }
            None => println!("{}: not present", mimetype),
        }
    }

    let whole = model.stringify(None)?;
    println!("\nWhole output as {}:", whole.mimetype());
    println!("{}", whole.remote().unwrap_or_default());
    for chunk in whole.get_chunks() {
        println!("  changed remote lines {:?}", chunk.edit_range());
    }

    Ok(())
}
