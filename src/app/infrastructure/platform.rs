//! Desktop theme probing used when the theme mode is `SystemDefault`.

use tracing::debug;

/// Returns true when the desktop reports a dark colour scheme.
/// Falls back to light when nothing can be detected.
pub fn detect_system_dark_mode() -> bool {
    let dark = probe().unwrap_or(false);
    debug!(dark, "system theme probed");
    dark
}

#[cfg(target_os = "windows")]
fn probe() -> Option<bool> {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    let personalize = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .ok()?;
    // AppsUseLightTheme: 0 = dark, 1 = light
    let light = personalize.get_value::<u32, _>("AppsUseLightTheme").ok()?;
    Some(light == 0)
}

#[cfg(target_os = "linux")]
fn probe() -> Option<bool> {
    let gtk_theme = command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "gtk-theme"]);
    if gtk_theme.is_some_and(|t| t.to_lowercase().contains("dark")) {
        return Some(true);
    }
    command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "color-scheme"])
        .map(|scheme| scheme.contains("prefer-dark"))
}

#[cfg(target_os = "macos")]
fn probe() -> Option<bool> {
    // `defaults` exits non-zero when the key is unset, which means light mode
    command_stdout("defaults", &["read", "-g", "AppleInterfaceStyle"])
        .map(|style| style.to_lowercase().contains("dark"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
fn probe() -> Option<bool> {
    None
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
