//! Toonify CLI - cartoon-style image transforms
//!
//! A small command-line front end over the Toonify library.

use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use toonify::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().collect();
    let program = args.remove(0);
    let config_path = take_option(&mut args, "--config").map(PathBuf::from);

    if args.is_empty() {
        print_usage(&program);
        return;
    }

    if let Err(error) = run(&program, &args, config_path.as_deref()).await {
        eprintln!("Error: {:#}", error);
        if let Some(fix) = error
            .downcast_ref::<ToonifyError>()
            .and_then(ToonifyError::suggested_fix)
        {
            eprintln!("Hint: {}", fix);
        }
        std::process::exit(1);
    }
}

async fn run(program: &str, args: &[String], config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = ToonifyConfig::resolve(config_path).context("failed to load configuration")?;
    let app = Toonify::from_config(&config, DiagnosticSink::none());

    match args[0].as_str() {
        "styles" | "list" => list_styles(&app),
        "info" => {
            let Some(style_id) = args.get(1) else {
                bail!("please specify a style id");
            };
            style_info(&app, style_id)?;
        }
        "transform" => {
            if args.len() < 3 {
                eprintln!("Usage: {} transform <input> <style> [--out <path>] [--save]", program);
            }
            transform(&app, &args[1..]).await?;
        }
        "gallery" => gallery(&app, &args[1..])?,
        "help" | "--help" | "-h" => print_usage(program),
        other => {
            print_usage(program);
            bail!("unknown command: {}", other);
        }
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("🎨 Toonify v{}", toonify::VERSION);
    println!();
    println!("Usage: {} [--config <file>] <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  styles                          List available styles");
    println!("  info <style>                    Show details about a style");
    println!("  transform <input> <style>       Transform an image file");
    println!("      --out <path>                Write the result here");
    println!("      --save                      Also save the result to the gallery");
    println!("  gallery list                    List saved gallery items");
    println!("  gallery delete <id>             Delete a gallery item");
    println!("  gallery export <id> [--dir d]   Write a gallery item's image to disk");
    println!("  help                            Show this help message");
    println!();
    println!("Configuration is read from --config or ${}.", toonify::core::config::CONFIG_ENV_VAR);
}

fn list_styles(app: &Toonify) {
    let styles = app.list_styles();
    println!("Available styles ({} total):", styles.len());
    println!();
    for style in styles {
        println!("  • {:<12} {} - {}", style.id, style.name, style.description);
    }
}

fn style_info(app: &Toonify, style_id: &str) -> anyhow::Result<()> {
    let Some(style) = app.catalog().get(style_id) else {
        bail!("style not found: {} (use 'styles' to see available styles)", style_id);
    };

    println!("Style: {}", style.name);
    println!("ID: {}", style.id);
    println!();
    println!("Description:");
    println!("  {}", style.description);
    println!();
    println!("Filter: {}", style.recipe);
    if !style.recipe.is_empty() {
        println!("Steps:");
        for op in style.recipe.ops() {
            println!("  • {} = {}", op.name(), op.amount());
        }
    }
    println!("Thumbnail: {}", style.thumbnail);
    Ok(())
}

async fn transform(app: &Toonify, args: &[String]) -> anyhow::Result<()> {
    let mut args = args.to_vec();
    let out = take_option(&mut args, "--out");
    let save = take_flag(&mut args, "--save");
    let [input, style_id, ..] = args.as_slice() else {
        bail!("please specify an input image and a style");
    };

    let original = DataUri::from_path(input)
        .with_context(|| format!("failed to read {}", input))?
        .to_string();

    println!("Transforming {} with style '{}'...", input, style_id);
    let output = app.transform(&original, style_id).await;

    match &output.status {
        TransformStatus::Applied => println!("✓ Applied '{}'", app.catalog().display_name(style_id)),
        TransformStatus::UnknownStyle => {
            println!("⚠ Unknown style '{}', image was re-encoded unchanged", style_id)
        }
        TransformStatus::Fallback(error) => {
            eprintln!("✗ {} ({})", error.user_message(), error);
        }
    }

    let default_name = format!(
        "{}-{}.jpg",
        Path::new(input)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image"),
        style_id
    );
    let target = out.unwrap_or(default_name);
    let path = app.download_image(&output.image, &target)?;
    println!("Saved to {}", path.display());

    if save && !output.is_fallback() {
        let item = app
            .save_transformed_image(&original, &output.image, style_id)
            .context("failed to save to gallery")?;
        println!("Added to gallery as {}", item.id);
    }
    Ok(())
}

fn gallery(app: &Toonify, args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        None | Some("list") => {
            let items = app.get_gallery_items();
            if items.is_empty() {
                println!("Gallery is empty.");
                return Ok(());
            }
            println!("Gallery ({} items):", items.len());
            for item in items {
                println!(
                    "  • {}  {:<14} {}",
                    item.id,
                    item.style_name,
                    item.timestamp_string()
                );
            }
        }
        Some("delete") => {
            let Some(id) = args.get(1) else {
                bail!("please specify a gallery item id");
            };
            app.delete_gallery_item(id).context("failed to delete from gallery")?;
            println!("Deleted {}", id);
        }
        Some("export") => {
            let mut rest = args[1..].to_vec();
            let dir = take_option(&mut rest, "--dir").map(PathBuf::from);
            let Some(id) = rest.first() else {
                bail!("please specify a gallery item id");
            };
            let Some(item) = app.gallery().get(id) else {
                bail!("gallery item not found: {}", id);
            };
            let path = match dir {
                Some(dir) => download_image(&item.transformed, &item.download_name(), &dir)?,
                None => app.download_image(&item.transformed, &item.download_name())?,
            };
            println!("Exported to {}", path.display());
        }
        Some(other) => bail!("unknown gallery command: {}", other),
    }
    Ok(())
}

fn take_option(args: &mut Vec<String>, name: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == name)?;
    if pos + 1 >= args.len() {
        args.remove(pos);
        return None;
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Some(value)
}

fn take_flag(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}
