use focusgrid_core::Config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let modes = config.modes()?;

    for mode in modes.iter() {
        let marker = if mode.name() == config.mode { "*" } else { " " };
        println!(
            "{marker} {:<12} focus {:>3} min  break {:>3} min",
            mode.name(),
            mode.focus_minutes(),
            mode.break_minutes()
        );
    }
    Ok(())
}
