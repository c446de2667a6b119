//! Export collaborator boundary.
//!
//! # Responsibility
//! - Describe an export request (file name, scale, colors).
//! - Provide a plain-text exporter that writes the board as a sheet.
//!
//! # Invariants
//! - Exporters read a grid snapshot; they never mutate board state.

use crate::model::grid::Grid;
use crate::model::settings::Settings;
use crate::view::sheet::{render_sheet, shown};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "my-mandalart.png";
pub const DEFAULT_EXPORT_SCALE: u32 = 2;
const TEXT_BASE_CELL_WIDTH: usize = 8;

/// Parameters handed to an exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub file_name: String,
    /// Resolution multiplier.
    pub scale: u32,
    pub background_color: String,
    pub text_color: Option<String>,
}

impl ExportRequest {
    /// Default request using the board's current colors.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            scale: DEFAULT_EXPORT_SCALE,
            background_color: settings.background_color.clone(),
            text_color: settings.text_color.clone(),
        }
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("mandalart")
    }
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug)]
pub enum ExportError {
    InvalidRequest(String),
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest(message) => write!(f, "invalid export request: {message}"),
            Self::Io { path, source } => write!(f, "failed to write `{}`: {source}", path.display()),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidRequest(_) => None,
        }
    }
}

/// Produces a visual snapshot of the board.
pub trait Exporter {
    fn export(&self, request: &ExportRequest, grid: &Grid) -> Result<ExportArtifact, ExportError>;
}

/// Writes the board as an aligned plain-text sheet into `out_dir`.
///
/// The request scale widens every cell; the file keeps the request stem
/// with a `.txt` extension.
#[derive(Debug, Clone)]
pub struct TextExporter {
    out_dir: PathBuf,
}

impl TextExporter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn render(request: &ExportRequest, grid: &Grid) -> String {
        let width = TEXT_BASE_CELL_WIDTH * request.scale as usize;
        let mut out = format!("background: {}\n", request.background_color);
        if let Some(color) = &request.text_color {
            out.push_str(&format!("text: {color}\n"));
        }
        out.push_str(&render_sheet(width, |pos| {
            shown(grid.get(pos), pos.placeholder())
        }));
        out
    }
}

impl Exporter for TextExporter {
    fn export(&self, request: &ExportRequest, grid: &Grid) -> Result<ExportArtifact, ExportError> {
        if request.scale == 0 {
            return Err(ExportError::InvalidRequest("scale must be at least 1".to_string()));
        }
        fs::create_dir_all(&self.out_dir).map_err(|source| ExportError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        let path = self.out_dir.join(format!("{}.txt", request.file_stem()));
        let body = Self::render(request, grid);
        fs::write(&path, &body).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        info!(
            "event=board_export module=export status=ok format=text bytes={}",
            body.len()
        );
        Ok(ExportArtifact {
            path,
            bytes: body.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ExportRequest, TextExporter};
    use crate::model::grid::{CellPos, Grid};
    use crate::model::settings::Settings;

    #[test]
    fn request_defaults_follow_settings() {
        let settings = Settings {
            background_color: "#ffffff".to_string(),
            ..Settings::default()
        };
        let request = ExportRequest::from_settings(&settings);
        assert_eq!(request.file_name, "my-mandalart.png");
        assert_eq!(request.file_stem(), "my-mandalart");
        assert_eq!(request.scale, 2);
        assert_eq!(request.background_color, "#ffffff");
    }

    #[test]
    fn render_includes_header_and_cells() {
        let mut grid = Grid::default();
        grid.set(CellPos::CORE_GOAL, "Become fluent");
        let request = ExportRequest::from_settings(&Settings::default());

        let text = TextExporter::render(&request, &grid);
        assert!(text.starts_with("background: #0f172a\n"));
        assert!(text.contains("Become fluent"));
        assert!(text.contains("<Sub Goal>"));
    }
}
