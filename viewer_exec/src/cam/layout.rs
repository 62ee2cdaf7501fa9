//! Grid layout of camera tiles on a display surface

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of tile columns.
pub const GRID_COLUMNS: usize = 4;

/// Number of tile rows the display is divided into.
pub const GRID_ROWS: usize = 2;

/// Offset of the serial label from the tile corner.
///
/// Units: pixels
pub const LABEL_OFFSET: f64 = 20.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Placement of one camera tile, in display coordinates centred on the
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePlacement {
    pub serial: String,

    /// Corner of the tile
    pub origin: [f64; 2],

    pub size: [f64; 2],

    /// Position of the serial label
    pub label: [f64; 2],
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Pack the given cameras row-major into a fixed-column grid.
///
/// The layout is recomputed from scratch on every call so that cameras
/// appearing mid-session simply shift into the grid.
pub fn grid_layout<'a, I>(serials: I, display_size: [f64; 2]) -> Vec<TilePlacement>
where
    I: IntoIterator<Item = &'a str>,
{
    let size = [
        display_size[0] / GRID_COLUMNS as f64,
        display_size[1] / GRID_ROWS as f64,
    ];
    let start = [-display_size[0] / 2.0, -display_size[1] / 2.0];

    serials
        .into_iter()
        .enumerate()
        .map(|(i, serial)| {
            let col = i % GRID_COLUMNS;
            let row = i / GRID_COLUMNS;
            let origin = [
                start[0] + col as f64 * size[0],
                start[1] + row as f64 * size[1],
            ];

            TilePlacement {
                serial: serial.to_string(),
                origin,
                size,
                label: [origin[0] + LABEL_OFFSET, origin[1] + LABEL_OFFSET],
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grid() {
        let serials = ["A", "B", "C", "D", "E"];
        let tiles = grid_layout(serials.iter().copied(), [800.0, 400.0]);

        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[0].origin, [-400.0, -200.0]);
        assert_eq!(tiles[0].size, [200.0, 200.0]);
        assert_eq!(tiles[0].label, [-380.0, -180.0]);
        assert_eq!(tiles[3].origin, [200.0, -200.0]);

        // Fifth tile wraps onto the second row
        assert_eq!(tiles[4].serial, "E");
        assert_eq!(tiles[4].origin, [-400.0, 0.0]);
    }

    #[test]
    fn test_empty() {
        assert!(grid_layout(std::iter::empty(), [800.0, 400.0]).is_empty());
    }
}
