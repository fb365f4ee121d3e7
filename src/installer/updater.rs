//! Updaters: versioned schema change units
//!
//! An updater is defined by implementing [`UpdaterDefinition`] and wrapped in
//! an [`Updater`], which discovers the definition's update procedures the
//! first time they are needed and keeps the resulting index for the lifetime
//! of the instance.
//!
//! ```rust,ignore
//! struct BlogSchema;
//!
//! impl UpdaterDefinition for BlogSchema {
//!     fn name(&self) -> &str {
//!         "blog::Schema"
//!     }
//!
//!     fn register_updates(&self, updates: &mut UpdateRegistrar) {
//!         updates.add(1, Some("Add the post table"), |runner, _| {
//!             runner.execute("create table post (id integer primary key)", &[])?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let updater = Updater::new(BlogSchema);
//! assert!(updater.update_exists(1));
//! ```

use crate::database::{Runner, Transaction};
use crate::error::{InstallError, InstallResult};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Prefix a procedure name must carry to be registered by name
pub const UPDATE_METHOD_PREFIX: &str = "update";

/// Description used for procedures registered without one
pub const UNDOCUMENTED_UPDATE: &str = "[undocumented update]";

/// A single update procedure
pub type UpdateProcedure = Rc<dyn Fn(&dyn Runner, &dyn Transaction) -> anyhow::Result<()>>;

/// A registered update: its procedure and normalized description
#[derive(Clone)]
pub struct Update {
    pub version: u32,
    pub description: String,
    procedure: UpdateProcedure,
}

impl Update {
    pub fn procedure(&self) -> UpdateProcedure {
        Rc::clone(&self.procedure)
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Collects the update procedures of one updater during discovery
pub struct UpdateRegistrar {
    owner: String,
    updates: BTreeMap<u32, Update>,
}

impl UpdateRegistrar {
    fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            updates: BTreeMap::new(),
        }
    }

    /// Register a procedure under an explicit version number
    ///
    /// The first registration of a version wins; later ones are ignored.
    pub fn add<F>(&mut self, version: u32, description: Option<&str>, procedure: F) -> &mut Self
    where
        F: Fn(&dyn Runner, &dyn Transaction) -> anyhow::Result<()> + 'static,
    {
        if self.updates.contains_key(&version) {
            warn!(
                "updater '{}' registers version {} more than once, keeping the first",
                self.owner, version
            );
            return self;
        }

        let description = description
            .and_then(normalize_description)
            .unwrap_or_else(|| UNDOCUMENTED_UPDATE.to_string());

        self.updates.insert(
            version,
            Update {
                version,
                description,
                procedure: Rc::new(procedure),
            },
        );
        self
    }

    /// Register a procedure by name, following the `update<digits>` convention
    ///
    /// Returns `false`, registering nothing, when the name does not follow it.
    pub fn add_named<F>(&mut self, method: &str, description: Option<&str>, procedure: F) -> bool
    where
        F: Fn(&dyn Runner, &dyn Transaction) -> anyhow::Result<()> + 'static,
    {
        match parse_update_version(method) {
            Some(version) => {
                self.add(version, description, procedure);
                true
            }
            None => {
                debug!(
                    "updater '{}': '{}' is not an update procedure name",
                    self.owner, method
                );
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Extract the version from an `update<digits>` procedure name
pub fn parse_update_version(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(UPDATE_METHOD_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Normalize a documentation block into compact description text
///
/// A leading comment marker (`/**`, `/*`, `*`, `///`, `//`, `--`, `#`) followed by
/// whitespace and a trailing `*/` are removed from every line, blank lines
/// are dropped and the remaining lines are joined
/// with newlines. Returns `None` when nothing is left.
pub fn normalize_description(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw
        .lines()
        .map(strip_comment_decoration)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Comment openers, longest first; only stripped when followed by whitespace
const COMMENT_MARKERS: [&str; 7] = ["/**", "///", "/*", "//", "--", "*", "#"];

fn strip_comment_decoration(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest.trim_end();
    }
    for marker in COMMENT_MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}

/// Behavior of one updater
///
/// Every lifecycle hook defaults to doing nothing. The install hooks run in
/// order `pre_install`, `install`, `post_install` inside a single transaction
/// the first time the updater is installed. The uninstall hooks are reserved:
/// the engine never calls them.
pub trait UpdaterDefinition {
    /// Globally unique identifier, also the key in the version store
    fn name(&self) -> &str;

    /// Declare the update procedures; called once per [`Updater`] instance
    fn register_updates(&self, _updates: &mut UpdateRegistrar) {}

    fn pre_install(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn install(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn post_install(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn pre_uninstall(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn uninstall(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }

    fn post_uninstall(&self, _runner: &dyn Runner, _transaction: &dyn Transaction) -> anyhow::Result<()> {
        Ok(())
    }
}

/// An updater instance with lazily discovered, cached update procedures
pub struct Updater {
    definition: Box<dyn UpdaterDefinition>,
    index: OnceCell<BTreeMap<u32, Update>>,
}

impl Updater {
    pub fn new<D: UpdaterDefinition + 'static>(definition: D) -> Self {
        Self {
            definition: Box::new(definition),
            index: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn definition(&self) -> &dyn UpdaterDefinition {
        self.definition.as_ref()
    }

    /// All update procedures by version, discovering them on first use
    pub fn find_update_methods(&self) -> &BTreeMap<u32, Update> {
        self.index.get_or_init(|| {
            let mut registrar = UpdateRegistrar::new(self.name());
            self.definition.register_updates(&mut registrar);
            debug!(
                "updater '{}' declares {} update(s)",
                self.name(),
                registrar.len()
            );
            registrar.updates
        })
    }

    pub fn update_exists(&self, version: u32) -> bool {
        self.find_update_methods().contains_key(&version)
    }

    fn get_update(&self, version: u32) -> InstallResult<&Update> {
        self.find_update_methods().get(&version).ok_or_else(|| {
            InstallError::InvalidArgument(format!(
                "{}::{}{}() does not exist",
                self.name(),
                UPDATE_METHOD_PREFIX,
                version
            ))
        })
    }

    /// Procedure registered for a version
    pub fn get_update_callback(&self, version: u32) -> InstallResult<UpdateProcedure> {
        Ok(self.get_update(version)?.procedure())
    }

    /// Normalized description of a version
    pub fn get_update_description(&self, version: u32) -> InstallResult<&str> {
        Ok(self.get_update(version)?.description.as_str())
    }

    /// Every registered version strictly greater than `version`, ascending
    pub fn get_missing_update_since(&self, version: i64) -> BTreeMap<u32, String> {
        self.find_update_methods()
            .iter()
            .filter(|(v, _)| i64::from(**v) > version)
            .map(|(v, update)| (*v, update.description.clone()))
            .collect()
    }

    pub fn pre_install(&self, runner: &dyn Runner, transaction: &dyn Transaction) -> anyhow::Result<()> {
        self.definition.pre_install(runner, transaction)
    }

    pub fn install(&self, runner: &dyn Runner, transaction: &dyn Transaction) -> anyhow::Result<()> {
        self.definition.install(runner, transaction)
    }

    pub fn post_install(&self, runner: &dyn Runner, transaction: &dyn Transaction) -> anyhow::Result<()> {
        self.definition.post_install(runner, transaction)
    }
}

impl fmt::Debug for Updater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Updater")
            .field("name", &self.name())
            .field("discovered", &self.index.get().is_some())
            .finish()
    }
}
