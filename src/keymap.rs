use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::ExplorerAction;
use crate::edit::EditAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct ExplorerKeyBindings {
    profile: KeymapProfile,
}

impl Default for ExplorerKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    /// Resolves a key pressed while the tree (not a name field) has focus.
    pub fn resolve<C>(&self, key: KeyEvent) -> Option<ExplorerAction<C>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('b') => Some(ExplorerAction::ToggleSidebar),
                _ => None,
            };
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<ExplorerAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(ExplorerAction::Custom(action));
        }

        self.resolve(key)
    }

    /// Resolves a key pressed while a name field is being edited.
    pub fn resolve_edit(&self, key: KeyEvent) -> Option<EditAction> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match key.code {
            KeyCode::Enter => Some(EditAction::Commit),
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => Some(EditAction::Blur),
            KeyCode::Backspace => Some(EditAction::Backspace),
            KeyCode::Delete => Some(EditAction::Delete),
            KeyCode::Left => Some(EditAction::CursorLeft),
            KeyCode::Right => Some(EditAction::CursorRight),
            KeyCode::Home => Some(EditAction::CursorHome),
            KeyCode::End => Some(EditAction::CursorEnd),
            KeyCode::Char(ch) => Some(EditAction::Insert(ch)),
            _ => None,
        }
    }

    const fn resolve_default_nav<C>(&self, key: KeyEvent) -> Option<ExplorerAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(ExplorerAction::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(ExplorerAction::SelectNext),
            KeyCode::Left | KeyCode::Char('h') => Some(ExplorerAction::Collapse),
            KeyCode::Right | KeyCode::Char('l') => Some(ExplorerAction::Expand),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(&self, key: KeyEvent) -> Option<ExplorerAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(ExplorerAction::SelectPrev),
            KeyCode::Char('j') => Some(ExplorerAction::SelectNext),
            KeyCode::Char('h') => Some(ExplorerAction::Collapse),
            KeyCode::Char('l') => Some(ExplorerAction::Expand),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(&self, key: KeyEvent) -> Option<ExplorerAction<C>> {
        match key.code {
            KeyCode::Up => Some(ExplorerAction::SelectPrev),
            KeyCode::Down => Some(ExplorerAction::SelectNext),
            KeyCode::Left => Some(ExplorerAction::Collapse),
            KeyCode::Right => Some(ExplorerAction::Expand),
            _ => None,
        }
    }

    fn resolve_common<C>(&self, key: KeyEvent) -> Option<ExplorerAction<C>> {
        match key.code {
            KeyCode::Enter => Some(ExplorerAction::ToggleNode),
            KeyCode::Delete => Some(ExplorerAction::DeleteNode),
            KeyCode::Char('a') => Some(ExplorerAction::AddFile),
            KeyCode::Char('A') => Some(ExplorerAction::AddFolder),
            KeyCode::Char('n') => Some(ExplorerAction::AddRootFile),
            KeyCode::Char('N') => Some(ExplorerAction::AddRootFolder),
            KeyCode::Char('r') | KeyCode::F(2) => Some(ExplorerAction::RenameNode),
            KeyCode::Char('g') => Some(ExplorerAction::ToggleGuides),
            KeyCode::Home => Some(ExplorerAction::SelectFirst),
            KeyCode::End => Some(ExplorerAction::SelectLast),
            _ => None,
        }
    }
}
