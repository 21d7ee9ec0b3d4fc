//! Check external tools and credentials.

use robovid_common::config::AppConfig;
use robovid_content_model::SentenceTemplateTable;
use robovid_render_engine::ImageMagickCompositor;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("Robovid System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;

    let compositor = ImageMagickCompositor::from_config(&config.render);
    if compositor.is_available() {
        println!("[OK] Compositor: {}", config.render.compositor_binary);
    } else {
        println!("[FAIL] Compositor '{}' not runnable", config.render.compositor_binary);
        all_ok = false;
    }

    let renderer = &config.render.renderer_binary;
    if which(renderer).is_some() {
        println!("[OK] Renderer: {}", renderer.display());
    } else {
        println!("[FAIL] Renderer '{}' not found", renderer.display());
        all_ok = false;
    }

    if config.render.template_project.exists() {
        println!("[OK] Template project: {}", config.render.template_project.display());
    } else {
        println!(
            "[WARN] Template project {} not found (relative to {})",
            config.render.template_project.display(),
            std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|_| "?".to_string())
        );
    }

    match config.text.keyword_api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => println!("[OK] Keyword service API key set"),
        _ => {
            println!("[FAIL] text.keyword_api_key is not set");
            all_ok = false;
        }
    }

    println!(
        "[OK] Sentence templates: {} (max sentences supported)",
        SentenceTemplateTable::default().len()
    );

    println!();
    if all_ok {
        println!("All required tools are available. Robovid is ready.");
    } else {
        println!("Some requirements are missing. See above.");
    }

    Ok(())
}

/// Resolve `program` the way the process launcher would.
fn which(program: &std::path::Path) -> Option<std::path::PathBuf> {
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
