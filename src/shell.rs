//! Desktop shell integration
//!
//! On Windows the self-copy is registered as an Explorer context menu verb for
//! files and folders under `HKCU\Software\Classes`. Other platforms have no
//! integration and registration is a no-op.

use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Registers the installed executable with the desktop shell
pub trait ShellIntegration {
    fn register(&self, executable: &Path) -> Result<()>;
}

/// Explorer context menu entries
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplorerContextMenu;

/// Verb key name under `...\shell\`
pub const VERB: &str = "JPEGLIOptimizer";

/// Classes root under `HKEY_CURRENT_USER`
const CLASSES: &str = r"Software\Classes";

/// A registry value to write: key path below `HKEY_CURRENT_USER`, value name
/// (`None` = default), data
#[cfg_attr(not(windows), allow(dead_code))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryValue {
    pub key: String,
    pub name: Option<&'static str>,
    pub data: String,
}

impl RegistryValue {
    /// Key path with the `HKCU` hive prefix, for messages
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn full_key(&self) -> String {
        format!(r"HKCU\{}", self.key)
    }
}

/// Registry values for the context menu entries pointing at `executable`
#[cfg_attr(not(windows), allow(dead_code))]
pub fn registry_values(executable: &Path) -> Vec<RegistryValue> {
    let exe = executable.display().to_string();
    let command = format!("\"{exe}\" \"%1\"");

    let mut values = Vec::new();
    for (class, label) in [
        ("*", "Optimize with JPEGLI"),
        ("Directory", "Optimize JPEGs with JPEGLI"),
    ] {
        let verb_key = format!(r"{CLASSES}\{class}\shell\{VERB}");
        values.push(RegistryValue {
            key: verb_key.clone(),
            name: None,
            data: label.to_string(),
        });
        values.push(RegistryValue {
            key: verb_key.clone(),
            name: Some("Icon"),
            data: exe.clone(),
        });
        values.push(RegistryValue {
            key: format!(r"{verb_key}\command"),
            name: None,
            data: command.clone(),
        });
    }
    values
}

impl ShellIntegration for ExplorerContextMenu {
    #[cfg(windows)]
    fn register(&self, executable: &Path) -> Result<()> {
        use tracing::{info, warn};
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        use crate::error::provision;

        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let mut first_error = None;
        for value in registry_values(executable) {
            let outcome = hkcu
                .create_subkey(&value.key)
                .and_then(|(key, _)| key.set_value(value.name.unwrap_or(""), &value.data));
            match outcome {
                Ok(()) => debug!("Set {}\\{}", value.full_key(), value.name.unwrap_or("(default)")),
                Err(e) => {
                    warn!("Error setting registry key {}: {e}", value.full_key());
                    first_error.get_or_insert_with(|| {
                        provision::registration_failed(value.full_key(), e.to_string())
                    });
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => {
                info!("Explorer context menu updated");
                Ok(())
            }
        }
    }

    #[cfg(not(windows))]
    fn register(&self, executable: &Path) -> Result<()> {
        debug!(
            "No shell integration on this platform, skipping registration of {}",
            executable.display()
        );
        Ok(())
    }
}
