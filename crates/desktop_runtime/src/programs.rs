//! Program catalog: the static table of everything the shell can open.
//!
//! The built-in catalog is `programs.toml`, validated and embedded by `build.rs`. Descriptors are
//! immutable once the registry is built.

use std::collections::HashMap;

use desktop_shell_contract::ProgramId;
use serde::Deserialize;
use thiserror::Error;

include!(concat!(env!("OUT_DIR"), "/program_catalog_generated.rs"));

/// Directory prefix for icon references.
pub const ICON_BASE_PATH: &str = "./assets/gui/";
/// Directory prefix for hosted program documents.
pub const PROGRAM_BASE_PATH: &str = "./src/apps/";
/// Status text of programs that declare none.
pub const DEFAULT_STATUS_TEXT: &str = "Ready";
/// Default window width.
pub const DEFAULT_WIDTH: i32 = 550;
/// Default window height.
pub const DEFAULT_HEIGHT: i32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Vertical edge shared with the target of a [`Anchor::LeftOf`] placement.
pub enum VerticalAlign {
    /// Top edges line up.
    Top,
    /// Bottom edges line up.
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fixed screen anchor of a custom-placed program.
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
    /// Centered on the desktop.
    Center,
    /// Vertically centered against the left edge.
    CenterLeft,
    /// Vertically centered against the right edge.
    CenterRight,
    /// Directly left of another program's window.
    LeftOf {
        /// Program whose window is the reference box.
        target: ProgramId,
        /// Shared vertical edge.
        align: VerticalAlign,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a newly opened window is placed.
pub enum Placement {
    /// Next slot of the shared cascade.
    Cascade,
    /// Fixed anchor plus pixel offsets.
    Anchored {
        /// Anchor to resolve.
        anchor: Anchor,
        /// Horizontal offset away from the anchor edge.
        offset_x: i32,
        /// Vertical offset away from the anchor edge.
        offset_y: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable display metadata and capabilities of one program.
pub struct ProgramDescriptor {
    /// Program identifier.
    pub id: ProgramId,
    /// Window title.
    pub title: String,
    /// Icon path.
    pub icon: String,
    /// Content document URI.
    pub source: String,
    /// Default width.
    pub width: i32,
    /// Default height.
    pub height: i32,
    /// Placement rule.
    pub placement: Placement,
    /// Whether the window can be minimized.
    pub can_minimize: bool,
    /// Whether the window can be maximized.
    pub can_maximize: bool,
    /// Status text shown when the window opens.
    pub initial_status: Option<String>,
    /// Whether content may replace the status text.
    pub dynamic_status: bool,
    /// Whether the window has a status line at all.
    pub status_bar: bool,
    /// Fixed secondary status cells.
    pub status_items: Vec<String>,
    /// Whether the content document keeps running while its window is closed.
    pub persists_across_close: bool,
    /// Whether a loading placeholder covers the content until it reports ready.
    pub shows_loading: bool,
    /// Whether the program has a desktop icon.
    pub desktop_icon: bool,
    /// Whether the program is listed in the start menu.
    pub start_menu: bool,
}

impl ProgramDescriptor {
    /// Creates a descriptor with catalog defaults.
    pub fn new(id: ProgramId, title: impl Into<String>) -> Self {
        let source = format!("{PROGRAM_BASE_PATH}{id}/index.html");
        Self {
            id,
            title: title.into(),
            icon: String::new(),
            source,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            placement: Placement::Cascade,
            can_minimize: true,
            can_maximize: true,
            initial_status: None,
            dynamic_status: false,
            status_bar: true,
            status_items: Vec::new(),
            persists_across_close: false,
            shows_loading: false,
            desktop_icon: false,
            start_menu: false,
        }
    }

    /// Returns a copy with a different default size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Returns a copy with a different placement rule.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns a copy with different minimize/maximize capabilities.
    pub fn with_capabilities(mut self, can_minimize: bool, can_maximize: bool) -> Self {
        self.can_minimize = can_minimize;
        self.can_maximize = can_maximize;
        self
    }

    /// Returns a copy whose content keeps running across close.
    pub fn persisting(mut self) -> Self {
        self.persists_across_close = true;
        self
    }

    /// Returns a copy whose status line content may update.
    pub fn with_dynamic_status(mut self, initial: impl Into<String>) -> Self {
        self.initial_status = Some(initial.into());
        self.dynamic_status = true;
        self
    }

    /// Status text a freshly opened window shows.
    pub fn opening_status(&self) -> String {
        self.initial_status
            .clone()
            .unwrap_or_else(|| DEFAULT_STATUS_TEXT.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// External link listed in the start menu.
pub struct StartMenuLink {
    /// Menu label.
    pub label: String,
    /// Target URL.
    pub url: String,
    /// Icon path.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Failures while building a [`ProgramRegistry`].
pub enum ProgramCatalogError {
    /// The catalog text is not valid JSON of the expected shape.
    #[error("program catalog parse failed: {0}")]
    Parse(String),
    /// A program id is not kebab-case.
    #[error("invalid program id in catalog: {0}")]
    InvalidProgramId(String),
    /// Two entries share an id.
    #[error("duplicate program `{0}`")]
    DuplicateProgram(ProgramId),
    /// A default size is zero or negative.
    #[error("program `{0}` has a non-positive size")]
    InvalidSize(ProgramId),
    /// A placement rule cannot be resolved.
    #[error("program `{program}` has an invalid placement: {reason}")]
    InvalidPlacement {
        /// Offending program.
        program: ProgramId,
        /// What is wrong.
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct PlacementEntry {
    anchor: String,
    #[serde(default)]
    offset_x: i32,
    #[serde(default)]
    offset_y: i32,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    align: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProgramEntry {
    id: String,
    title: String,
    icon: String,
    path: String,
    width: Option<i32>,
    height: Option<i32>,
    placement: Option<PlacementEntry>,
    can_minimize: Option<bool>,
    can_maximize: Option<bool>,
    initial_status: Option<String>,
    dynamic_status: Option<bool>,
    status_bar: Option<bool>,
    #[serde(default)]
    status_items: Vec<String>,
    persists_across_close: Option<bool>,
    shows_loading: Option<bool>,
    desktop_icon: Option<bool>,
    start_menu: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    programs: Vec<ProgramEntry>,
    #[serde(default)]
    links: Vec<StartMenuLink>,
}

fn parse_placement(
    program: &ProgramId,
    entry: PlacementEntry,
) -> Result<Placement, ProgramCatalogError> {
    let invalid = |reason: String| ProgramCatalogError::InvalidPlacement {
        program: program.clone(),
        reason,
    };
    let anchor = match entry.anchor.as_str() {
        "cascade" => return Ok(Placement::Cascade),
        "top-left" => Anchor::TopLeft,
        "top-right" => Anchor::TopRight,
        "bottom-left" => Anchor::BottomLeft,
        "bottom-right" => Anchor::BottomRight,
        "center" => Anchor::Center,
        "center-left" => Anchor::CenterLeft,
        "center-right" => Anchor::CenterRight,
        "left-of" => {
            let raw_target = entry
                .target
                .ok_or_else(|| invalid("left-of requires a target".to_string()))?;
            let target = ProgramId::new(raw_target).map_err(|err| invalid(err.to_string()))?;
            let align = match entry.align.as_deref() {
                None | Some("bottom") => VerticalAlign::Bottom,
                Some("top") => VerticalAlign::Top,
                Some(other) => return Err(invalid(format!("unknown align `{other}`"))),
            };
            Anchor::LeftOf { target, align }
        }
        other => return Err(invalid(format!("unknown anchor `{other}`"))),
    };
    Ok(Placement::Anchored {
        anchor,
        offset_x: entry.offset_x,
        offset_y: entry.offset_y,
    })
}

impl TryFrom<ProgramEntry> for ProgramDescriptor {
    type Error = ProgramCatalogError;

    fn try_from(entry: ProgramEntry) -> Result<Self, Self::Error> {
        let id = ProgramId::new(entry.id).map_err(|err| {
            ProgramCatalogError::InvalidProgramId(err.to_string())
        })?;
        let placement = match entry.placement {
            Some(placement) => parse_placement(&id, placement)?,
            None => Placement::Cascade,
        };
        Ok(Self {
            title: entry.title,
            icon: format!("{ICON_BASE_PATH}{}", entry.icon),
            source: format!("{PROGRAM_BASE_PATH}{}/index.html", entry.path),
            width: entry.width.unwrap_or(DEFAULT_WIDTH),
            height: entry.height.unwrap_or(DEFAULT_HEIGHT),
            placement,
            can_minimize: entry.can_minimize.unwrap_or(true),
            can_maximize: entry.can_maximize.unwrap_or(true),
            initial_status: entry.initial_status,
            dynamic_status: entry.dynamic_status.unwrap_or(false),
            status_bar: entry.status_bar.unwrap_or(true),
            status_items: entry.status_items,
            persists_across_close: entry.persists_across_close.unwrap_or(false),
            shows_loading: entry.shows_loading.unwrap_or(false),
            desktop_icon: entry.desktop_icon.unwrap_or(false),
            start_menu: entry.start_menu.unwrap_or(false),
            id,
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Read-only lookup table of [`ProgramDescriptor`] values in catalog order.
pub struct ProgramRegistry {
    programs: Vec<ProgramDescriptor>,
    index: HashMap<ProgramId, usize>,
    links: Vec<StartMenuLink>,
}

impl ProgramRegistry {
    /// Builds the registry embedded from `programs.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramCatalogError`] when the embedded catalog is inconsistent.
    pub fn builtin() -> Result<Self, ProgramCatalogError> {
        Self::from_catalog_json(PROGRAM_CATALOG_JSON)
    }

    /// Builds a registry from catalog JSON in the `programs.toml` shape.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramCatalogError`] when parsing or validation fails.
    pub fn from_catalog_json(raw: &str) -> Result<Self, ProgramCatalogError> {
        let catalog: CatalogFile =
            serde_json::from_str(raw).map_err(|err| ProgramCatalogError::Parse(err.to_string()))?;
        let programs = catalog
            .programs
            .into_iter()
            .map(ProgramDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let links = catalog
            .links
            .into_iter()
            .map(|link| StartMenuLink {
                icon: format!("{ICON_BASE_PATH}{}", link.icon),
                ..link
            })
            .collect();
        Self::from_descriptors(programs, links)
    }

    /// Builds a registry from prepared descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`ProgramCatalogError`] for duplicate ids, non-positive sizes, or `LeftOf`
    /// placements pointing at unknown programs.
    pub fn from_descriptors(
        programs: Vec<ProgramDescriptor>,
        links: Vec<StartMenuLink>,
    ) -> Result<Self, ProgramCatalogError> {
        let mut index = HashMap::with_capacity(programs.len());
        for (position, program) in programs.iter().enumerate() {
            if program.width <= 0 || program.height <= 0 {
                return Err(ProgramCatalogError::InvalidSize(program.id.clone()));
            }
            if index.insert(program.id.clone(), position).is_some() {
                return Err(ProgramCatalogError::DuplicateProgram(program.id.clone()));
            }
        }

        for program in &programs {
            if let Placement::Anchored {
                anchor: Anchor::LeftOf { target, .. },
                ..
            } = &program.placement
            {
                if !index.contains_key(target) || *target == program.id {
                    return Err(ProgramCatalogError::InvalidPlacement {
                        program: program.id.clone(),
                        reason: format!("left-of target `{target}` is not another program"),
                    });
                }
            }
        }

        Ok(Self {
            programs,
            index,
            links,
        })
    }

    /// Looks up a program. Absence is reported, not raised.
    pub fn get(&self, id: &ProgramId) -> Option<&ProgramDescriptor> {
        self.index.get(id).map(|&position| &self.programs[position])
    }

    /// Iterates every program in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ProgramDescriptor> {
        self.programs.iter()
    }

    /// Programs with a desktop icon, in catalog order.
    pub fn desktop_programs(&self) -> impl Iterator<Item = &ProgramDescriptor> {
        self.programs.iter().filter(|program| program.desktop_icon)
    }

    /// Programs listed in the start menu, in catalog order.
    pub fn start_menu_programs(&self) -> impl Iterator<Item = &ProgramDescriptor> {
        self.programs.iter().filter(|program| program.start_menu)
    }

    /// External start-menu links.
    pub fn links(&self) -> &[StartMenuLink] {
        &self.links
    }

    /// Number of programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns `true` when the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pid(raw: &str) -> ProgramId {
        ProgramId::trusted(raw)
    }

    #[test]
    fn builtin_catalog_loads_every_program() {
        let registry = ProgramRegistry::builtin().expect("builtin catalog");
        assert_eq!(registry.len(), 9);

        let notepad = registry.get(&pid("notepad")).expect("notepad");
        assert_eq!(notepad.width, DEFAULT_WIDTH);
        assert_eq!(notepad.height, DEFAULT_HEIGHT);
        assert_eq!(notepad.source, "./src/apps/notepad/index.html");
        assert_eq!(notepad.icon, "./assets/gui/start-menu/notepad.webp");
        assert_eq!(notepad.status_items, vec!["ANSI", "Windows (CRLF)", "100%"]);
        assert!(notepad.dynamic_status);

        let media = registry.get(&pid("media-player")).expect("media player");
        assert!(media.persists_across_close);
        assert_eq!(media.opening_status(), "Stopped");

        let sys_info = registry.get(&pid("sys-info")).expect("sys info");
        assert!(!sys_info.can_minimize);
        assert!(!sys_info.can_maximize);
        assert_eq!(
            sys_info.placement,
            Placement::Anchored {
                anchor: Anchor::TopRight,
                offset_x: 40,
                offset_y: 40
            }
        );

        assert!(!registry.get(&pid("cmd-prompt")).expect("cmd").status_bar);
        assert_eq!(registry.links().len(), 3);
        assert!(registry.links()[0].icon.starts_with(ICON_BASE_PATH));
    }

    #[test]
    fn unknown_program_is_absent() {
        let registry = ProgramRegistry::builtin().expect("builtin catalog");
        assert!(registry.get(&pid("solitaire")).is_none());
    }

    #[test]
    fn opening_status_defaults_to_ready() {
        let descriptor = ProgramDescriptor::new(pid("paint"), "Paint");
        assert_eq!(descriptor.opening_status(), DEFAULT_STATUS_TEXT);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ProgramRegistry::from_descriptors(
            vec![
                ProgramDescriptor::new(pid("a"), "A"),
                ProgramDescriptor::new(pid("a"), "A again"),
            ],
            Vec::new(),
        )
        .expect_err("duplicate");
        assert_eq!(err, ProgramCatalogError::DuplicateProgram(pid("a")));
    }

    #[test]
    fn left_of_targets_must_exist() {
        let orphan = ProgramDescriptor::new(pid("b"), "B").with_placement(Placement::Anchored {
            anchor: Anchor::LeftOf {
                target: pid("missing"),
                align: VerticalAlign::Top,
            },
            offset_x: 0,
            offset_y: 0,
        });
        assert!(matches!(
            ProgramRegistry::from_descriptors(vec![orphan], Vec::new()),
            Err(ProgramCatalogError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn catalog_json_reports_bad_anchor() {
        let raw = r#"{"programs":[{"id":"a","title":"A","icon":"a.webp","path":"a",
            "placement":{"anchor":"upside-down"}}]}"#;
        assert!(matches!(
            ProgramRegistry::from_catalog_json(raw),
            Err(ProgramCatalogError::InvalidPlacement { .. })
        ));
        assert!(matches!(
            ProgramRegistry::from_catalog_json("not json"),
            Err(ProgramCatalogError::Parse(_))
        ));
    }
}
