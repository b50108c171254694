//! Provisioning of the bundled toolset
//!
//! An install is a linear, run-to-completion sequence over the managed
//! directory:
//!
//! 1. reset: delete the managed directory (failure is logged, not fatal);
//!    the running executable is read into memory first
//! 2. relocate: write that executable into it (fatal on failure)
//! 3. extract: unpack every bundled archive into its own tree; a failing
//!    archive is recorded and skipped
//! 4. locate: find `cjpegli` and `exiftool` in the trees whose archive name
//!    carries the tool's identifier; the first tree that yields a tool wins
//! 5. verify: both tools must have been found
//! 6. register: hand the self-copy to the shell integration (failure is
//!    logged, not fatal)
//!
//! [`resolve_tools`] runs step 4 alone against what is already on disk.

pub mod archive;
pub mod bundled;
pub mod locator;
pub mod relocate;
pub mod tools;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{JpegliError, Result, fs as fs_error};
use crate::paths::ManagedDirectory;
use crate::shell::ShellIntegration;

use bundled::BundledArchive;
use tools::{ExecutablePaths, Tool, Toolset};

/// Outcome of extracting one bundled archive
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Archive file name
    pub archive: String,
    /// Extraction tree on success
    pub result: std::result::Result<PathBuf, JpegliError>,
}

impl ArchiveOutcome {
    pub fn tree(&self) -> Option<&Path> {
        self.result.as_ref().ok().map(PathBuf::as_path)
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// A successful install
#[derive(Debug)]
pub struct Provisioned {
    /// Copy of the running executable inside the managed directory
    pub self_copy: PathBuf,
    pub toolset: Toolset,
    /// One outcome per bundled archive, in bundle order
    pub archives: Vec<ArchiveOutcome>,
}

/// Drives an install into a managed directory
pub struct Provisioner<'a> {
    managed: &'a ManagedDirectory,
    archives: &'a [BundledArchive<'a>],
    executable: PathBuf,
}

impl<'a> Provisioner<'a> {
    /// `executable` is the binary to copy into the managed directory,
    /// normally [`relocate::current_executable`]
    pub fn new(
        managed: &'a ManagedDirectory,
        archives: &'a [BundledArchive<'a>],
        executable: PathBuf,
    ) -> Self {
        Self {
            managed,
            archives,
            executable,
        }
    }

    /// Run a full install
    pub fn install(&self, shell: &dyn ShellIntegration) -> Result<Provisioned> {
        info!("Installing into {}", self.managed.path().display());

        let image = relocate::ExecutableImage::read(&self.executable, self.managed)?;

        if let Err(e) = self.managed.reset_all() {
            warn!("Error deleting {}: {e}", self.managed.path().display());
        }

        let self_copy = image.write_to(self.managed)?;

        let archives = self.extract_all();
        let tools = locate_in_trees(
            archives
                .iter()
                .filter_map(|outcome| Some((outcome.archive.as_str(), outcome.tree()?))),
        );

        for outcome in archives.iter().filter(|o| !o.is_success()) {
            warn!("Archive {} was skipped", outcome.archive);
        }
        let toolset = tools.require(self.managed.path())?;

        if let Err(e) = shell.register(&self_copy) {
            warn!("Shell integration failed: {e}");
        }

        Ok(Provisioned {
            self_copy,
            toolset,
            archives,
        })
    }

    /// Write and extract every bundled archive, recording each outcome
    pub fn extract_all(&self) -> Vec<ArchiveOutcome> {
        self.archives
            .iter()
            .map(|archive| {
                let result = self.extract_one(archive);
                if let Err(e) = &result {
                    warn!("Error extracting {}: {e}", archive.name);
                }
                ArchiveOutcome {
                    archive: archive.name.to_string(),
                    result,
                }
            })
            .collect()
    }

    fn extract_one(&self, archive: &BundledArchive<'_>) -> Result<PathBuf> {
        info!("Extracting '{}' ...", archive.name);

        let archive_path = self.managed.archive_path(archive.name);
        fs::write(&archive_path, archive.bytes).map_err(|e| {
            fs_error::write_failed(archive_path.display().to_string(), e.to_string())
        })?;

        let tree = self.managed.extraction_dir(archive.name);
        fs::create_dir_all(&tree).map_err(|e| {
            fs_error::create_dir_failed(tree.display().to_string(), e.to_string())
        })?;

        let files = archive::extract_zip(&archive_path, &tree)?;
        info!(
            "Extracted {files} file(s) from {} to {}",
            archive.name,
            tree.display()
        );
        Ok(tree)
    }
}

/// Locate both tools across `(archive name, tree)` pairs
///
/// A tree is only searched for a tool when its archive name contains the
/// tool's identifier and the tool has not been found in an earlier tree.
pub fn locate_in_trees<'t>(
    trees: impl IntoIterator<Item = (&'t str, &'t Path)>,
) -> ExecutablePaths {
    let mut paths = ExecutablePaths::default();

    for (name, tree) in trees {
        if paths.is_complete() {
            break;
        }
        for tool in Tool::ALL {
            if paths.get(tool).is_some() || !name.contains(tool.archive_identifier()) {
                continue;
            }
            if let Some(found) = locator::locate(tree, tool) {
                paths.record(tool, found);
            }
        }
    }

    paths
}

/// Locate the tools of a previous install without touching the disk layout
///
/// A missing managed directory yields an empty result.
pub fn resolve_tools(managed: &ManagedDirectory) -> ExecutablePaths {
    let trees = managed.extraction_trees();
    locate_in_trees(trees.iter().filter_map(|tree| {
        let name = tree.file_name()?.to_str()?;
        Some((name, tree.as_path()))
    }))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::archive::tests::{Entry, build_zip};
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Shell integration double that records registrations
    #[derive(Default)]
    struct RecordingShell {
        registered: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl ShellIntegration for RecordingShell {
        fn register(&self, executable: &Path) -> Result<()> {
            self.registered.borrow_mut().push(executable.to_path_buf());
            if self.fail {
                return Err(crate::error::provision::registration_failed(
                    "HKCU\\Software\\Classes",
                    "access denied",
                ));
            }
            Ok(())
        }
    }

    struct Fixture {
        temp: TempDir,
        managed: ManagedDirectory,
        executable: PathBuf,
        exiftool_zip: Vec<u8>,
        jpegli_zip: Vec<u8>,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().expect("Failed to create temp directory");
            let executable = temp.path().join("downloads").join("jpegli-explorer");
            fs::create_dir_all(executable.parent().expect("parent")).expect("mkdir");
            fs::write(&executable, b"self").expect("Failed to write executable");
            let managed = ManagedDirectory::resolve(&temp.path().join("cache"));

            Self {
                temp,
                managed,
                executable,
                exiftool_zip: build_zip(&[Entry::File("exiftool(-k).exe", b"exiftool")]),
                jpegli_zip: build_zip(&[
                    Entry::Dir("bin/"),
                    Entry::File("bin/cjpegli.exe", b"cjpegli"),
                    Entry::File("bin/djpegli.exe", b"djpegli"),
                ]),
            }
        }

        fn archives(&self) -> Vec<BundledArchive<'_>> {
            vec![
                BundledArchive {
                    name: "exiftool.zip",
                    bytes: &self.exiftool_zip,
                },
                BundledArchive {
                    name: "jpegli.zip",
                    bytes: &self.jpegli_zip,
                },
            ]
        }

        fn install(
            &self,
            archives: &[BundledArchive<'_>],
            shell: &dyn ShellIntegration,
        ) -> Result<Provisioned> {
            Provisioner::new(&self.managed, archives, self.executable.clone()).install(shell)
        }
    }

    fn listing(root: &Path) -> Vec<PathBuf> {
        let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .map(|e| e.path().strip_prefix(root).expect("prefix").to_path_buf())
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_install_provisions_both_tools() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();

        let provisioned = fixture
            .install(&fixture.archives(), &shell)
            .expect("install should succeed");

        let toolset = &provisioned.toolset;
        assert!(toolset.exiftool.ends_with("exiftool/exiftool.exe"));
        assert!(toolset.cjpegli.ends_with("jpegli/bin/cjpegli.exe"));
        assert!(toolset.exiftool.is_file());
        assert!(toolset.cjpegli.is_file());
        assert!(!toolset.exiftool.to_string_lossy().contains("(-k)"));

        assert_eq!(provisioned.self_copy, fixture.managed.self_copy_path());
        assert!(provisioned.self_copy.is_file());
        assert!(fixture.managed.archive_path("exiftool.zip").is_file());
        assert!(fixture.managed.archive_path("jpegli.zip").is_file());
        assert!(provisioned.archives.iter().all(ArchiveOutcome::is_success));
        assert_eq!(*shell.registered.borrow(), vec![provisioned.self_copy]);
    }

    #[test]
    fn test_install_twice_is_idempotent() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let archives = fixture.archives();

        let first = fixture.install(&archives, &shell).expect("first install");
        let first_listing = listing(fixture.managed.path());

        fs::write(fixture.managed.path().join("stale.txt"), b"old").expect("write stale");
        fs::create_dir_all(fixture.managed.path().join("old-tree")).expect("mkdir stale");

        let second = fixture.install(&archives, &shell).expect("second install");

        assert_eq!(first.toolset, second.toolset);
        assert_eq!(listing(fixture.managed.path()), first_listing);
        assert!(!fixture.managed.path().join("stale.txt").exists());
        assert!(!fixture.managed.path().join("old-tree").exists());
    }

    #[test]
    fn test_reinstall_from_self_copy() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let archives = fixture.archives();
        let first = fixture.install(&archives, &shell).expect("first install");

        let second = Provisioner::new(&fixture.managed, &archives, fixture.managed.self_copy_path())
            .install(&shell)
            .expect("install from the self-copy should succeed");

        assert_eq!(fs::read(&second.self_copy).expect("self-copy kept"), b"self");
        assert_eq!(first.toolset, second.toolset);
        assert!(second.toolset.cjpegli.is_file());
        assert_eq!(shell.registered.borrow().len(), 2);
    }

    #[test]
    fn test_corrupt_archive_is_skipped() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let mut archives = fixture.archives();
        archives.insert(
            0,
            BundledArchive {
                name: "broken.zip",
                bytes: b"not a zip",
            },
        );

        let provisioned = fixture
            .install(&archives, &shell)
            .expect("install should tolerate a broken archive");

        assert_eq!(provisioned.archives.len(), 3);
        assert_eq!(provisioned.archives[0].archive, "broken.zip");
        assert!(matches!(
            provisioned.archives[0].result,
            Err(JpegliError::ArchiveOpenFailed { .. })
        ));
        assert!(provisioned.archives[1].is_success());
        assert!(provisioned.archives[2].is_success());
    }

    #[test]
    fn test_escaping_archive_fails_that_archive_only() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let evil = build_zip(&[Entry::File("../../evil.exe", b"pwned")]);
        let mut archives = fixture.archives();
        archives.push(BundledArchive {
            name: "evil.zip",
            bytes: &evil,
        });

        let provisioned = fixture
            .install(&archives, &shell)
            .expect("install should succeed without the evil archive");

        let evil_outcome = provisioned
            .archives
            .iter()
            .find(|o| o.archive == "evil.zip")
            .expect("outcome recorded");
        assert!(matches!(
            evil_outcome.result,
            Err(JpegliError::PathTraversal { .. })
        ));
        assert!(!fixture.temp.path().join("cache").join("evil.exe").exists());
        assert!(!fixture.temp.path().join("evil.exe").exists());
    }

    #[test]
    fn test_missing_tool_fails_install() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let archives = vec![BundledArchive {
            name: "exiftool.zip",
            bytes: &fixture.exiftool_zip,
        }];

        let err = fixture
            .install(&archives, &shell)
            .expect_err("install without cjpegli must fail");

        assert!(matches!(err, JpegliError::ToolNotFound { ref tool, .. } if tool == "cjpegli"));
        assert!(shell.registered.borrow().is_empty());
    }

    #[test]
    fn test_no_archives_fails_install() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();

        let err = fixture
            .install(&[], &shell)
            .expect_err("install without archives must fail");

        assert!(matches!(err, JpegliError::ToolNotFound { .. }));
    }

    #[test]
    fn test_self_relocation_failure_is_fatal() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let archives = fixture.archives();
        let provisioner = Provisioner::new(
            &fixture.managed,
            &archives,
            fixture.temp.path().join("does-not-exist"),
        );

        let err = provisioner
            .install(&shell)
            .expect_err("relocation failure must abort");

        assert!(matches!(err, JpegliError::SelfRelocationFailed { .. }));
        assert!(!fixture.managed.extraction_dir("jpegli.zip").exists());
        assert!(shell.registered.borrow().is_empty());
    }

    #[test]
    fn test_registration_failure_is_not_fatal() {
        let fixture = Fixture::new();
        let shell = RecordingShell {
            fail: true,
            ..RecordingShell::default()
        };

        let provisioned = fixture.install(&fixture.archives(), &shell);

        assert!(provisioned.is_ok());
        assert_eq!(shell.registered.borrow().len(), 1);
    }

    #[test]
    fn test_first_found_tree_wins() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let other = build_zip(&[Entry::File("cjpegli.exe", b"other")]);
        let mut archives = fixture.archives();
        archives.push(BundledArchive {
            name: "jpegli-nightly.zip",
            bytes: &other,
        });

        let provisioned = fixture.install(&archives, &shell).expect("install");

        assert!(provisioned.toolset.cjpegli.ends_with("jpegli/bin/cjpegli.exe"));
    }

    #[test]
    fn test_trees_only_searched_for_their_tool() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let misc = temp.path().join("misc");
        fs::create_dir_all(&misc).expect("mkdir");
        fs::write(misc.join("cjpegli.exe"), b"x").expect("write");

        let paths = locate_in_trees([("misc", misc.as_path())]);
        assert_eq!(paths, ExecutablePaths::default());
    }

    #[test]
    fn test_resolve_tools_after_install() {
        let fixture = Fixture::new();
        let shell = RecordingShell::default();
        let provisioned = fixture
            .install(&fixture.archives(), &shell)
            .expect("install");

        let resolved = resolve_tools(&fixture.managed);

        assert_eq!(
            resolved.image_tool.as_deref(),
            Some(provisioned.toolset.cjpegli.as_path())
        );
        assert_eq!(
            resolved.metadata_tool.as_deref(),
            Some(provisioned.toolset.exiftool.as_path())
        );
    }

    #[test]
    fn test_resolve_tools_on_missing_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());

        let resolved = resolve_tools(&managed);

        assert_eq!(resolved, ExecutablePaths::default());
        assert!(!managed.path().exists());
    }

    #[test]
    fn test_resolve_tools_on_empty_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());
        fs::create_dir_all(managed.path()).expect("mkdir");

        let resolved = resolve_tools(&managed);

        assert_eq!(resolved, ExecutablePaths::default());
        assert_eq!(listing(managed.path()), vec![PathBuf::new()]);
    }
}
