use std::{env, fs, path::PathBuf};

use anyhow::Context;
use db::models::contact::{Contact, CreateContact};
use server::routes::health::HealthStatus;
use ts_rs::TS;
use utils::response::ApiResponse;

const DEFAULT_OUTPUT: &str = "shared/types.ts";

fn generate_types_content() -> String {
    let decls = [
        Contact::decl(),
        CreateContact::decl(),
        HealthStatus::decl(),
        ApiResponse::<()>::decl(),
    ];

    let mut content = String::from(
        "// This file was generated by `cargo run --bin generate_types`. Do not edit it manually.\n\n",
    );
    for decl in decls {
        content.push_str("export ");
        content.push_str(&decl);
        content.push_str("\n\n");
    }
    content.truncate(content.trim_end().len());
    content.push('\n');
    content
}

fn main() -> anyhow::Result<()> {
    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&output, generate_types_content())
        .with_context(|| format!("writing {}", output.display()))?;

    println!("Wrote TypeScript types to {}", output.display());
    Ok(())
}
