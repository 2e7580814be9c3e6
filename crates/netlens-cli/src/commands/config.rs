use anyhow::Result;
use colored::Colorize;
use netlens_infrastructure::ConfigService;

pub fn init(service: &ConfigService) -> Result<()> {
    if service.write_default()? {
        println!("{} {}", "Configuración creada:".green(), service.path().display());
    } else {
        println!(
            "{} {}",
            "Ya existe una configuración en".yellow(),
            service.path().display()
        );
    }
    Ok(())
}

/// Prints the configuration after environment overrides.
pub fn show(service: &ConfigService) -> Result<()> {
    let config = service.load()?;
    println!("{}", format!("# {}", service.path().display()).bright_black());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
