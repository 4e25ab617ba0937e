//! Start menu state and item activation.

use desktop_shell_contract::ProgramId;

use crate::{events::ShellEvent, programs::ProgramRegistry, window_manager::Transition};

const VANITY_ICON_PATH: &str = "./assets/gui/start-menu/vanity-apps/";
const LOG_OFF_ICON: &str = "./assets/gui/start-menu/logoff.webp";

/// Tools listed for show; activating them does nothing.
const VANITY_TOOLS: &[(&str, &str)] = &[
    ("Adobe Photoshop", "photoshop.webp"),
    ("Adobe Premiere Pro", "premiere.webp"),
    ("Adobe Illustrator", "illustrator.webp"),
    ("Blender", "blender.webp"),
    ("VS Code", "vscode.webp"),
    ("Figma", "figma.webp"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the start menu.
pub enum StartMenuItem {
    /// Opens or focuses a program.
    Program {
        /// Program to open.
        program: ProgramId,
        /// Row label.
        title: String,
        /// Icon path.
        icon: String,
    },
    /// Opens an external URL in a new browsing context.
    Link {
        /// Row label.
        label: String,
        /// Target URL.
        url: String,
        /// Icon path.
        icon: String,
    },
    /// Greyed-out row.
    Disabled {
        /// Row label.
        label: String,
        /// Icon path.
        icon: String,
    },
    /// Ends the session.
    LogOff,
}

impl StartMenuItem {
    /// Row label.
    pub fn label(&self) -> &str {
        match self {
            Self::Program { title, .. } => title,
            Self::Link { label, .. } | Self::Disabled { label, .. } => label,
            Self::LogOff => "Log Off",
        }
    }

    /// Image source for the row, ready to render.
    pub fn icon(&self) -> &str {
        match self {
            Self::Program { icon, .. } | Self::Link { icon, .. } | Self::Disabled { icon, .. } => {
                icon
            }
            Self::LogOff => LOG_OFF_ICON,
        }
    }

    /// Whether activating the row does anything.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Open/closed state of the start menu and its rows.
pub struct StartMenuController {
    open: bool,
    items: Vec<StartMenuItem>,
}

impl StartMenuController {
    /// Builds the menu rows from the catalog: programs, links, vanity tools, then Log Off.
    pub fn new(registry: &ProgramRegistry) -> Self {
        let programs = registry
            .start_menu_programs()
            .map(|program| StartMenuItem::Program {
                program: program.id.clone(),
                title: program.title.clone(),
                icon: program.icon.clone(),
            });
        let links = registry.links().iter().map(|link| StartMenuItem::Link {
            label: link.label.clone(),
            url: link.url.clone(),
            icon: link.icon.clone(),
        });
        let vanity = VANITY_TOOLS
            .iter()
            .map(|(label, icon)| StartMenuItem::Disabled {
                label: (*label).to_string(),
                icon: format!("{VANITY_ICON_PATH}{icon}"),
            });

        Self {
            open: false,
            items: programs
                .chain(links)
                .chain(vanity)
                .chain(std::iter::once(StartMenuItem::LogOff))
                .collect(),
        }
    }

    /// Whether the menu is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Menu rows in display order.
    pub fn items(&self) -> &[StartMenuItem] {
        &self.items
    }

    /// Opens a closed menu or closes an open one.
    pub fn toggle(&mut self) -> Transition {
        if self.open {
            self.close()
        } else {
            self.open = true;
            vec![ShellEvent::StartMenuOpened]
        }
    }

    /// Closes the menu. No-op when already closed.
    pub fn close(&mut self) -> Transition {
        if !self.open {
            return Vec::new();
        }
        self.open = false;
        vec![ShellEvent::StartMenuClosed]
    }

    /// Handles a key press anywhere in the document.
    pub fn handle_key(&mut self, key: &str) -> Transition {
        match key {
            "Escape" => self.close(),
            _ => Vec::new(),
        }
    }

    /// Handles a pointer press outside the menu and the start button.
    pub fn handle_outside_click(&mut self) -> Transition {
        self.close()
    }

    /// Activates the row at `index`. Enabled rows close the menu after their intent.
    pub fn activate(&mut self, index: usize) -> Transition {
        if !self.open {
            return Vec::new();
        }
        let intent = match self.items.get(index) {
            Some(StartMenuItem::Program { program, .. }) => ShellEvent::ProgramOpenRequested {
                program: program.clone(),
            },
            Some(StartMenuItem::Link { url, .. }) => ShellEvent::UrlOpenRequested { url: url.clone() },
            Some(StartMenuItem::LogOff) => ShellEvent::LogOffRequested,
            Some(StartMenuItem::Disabled { .. }) | None => return Vec::new(),
        };
        let mut events = vec![intent];
        events.extend(self.close());
        events
    }
}
