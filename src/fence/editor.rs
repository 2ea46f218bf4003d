use crate::domain::{GeoPoint, MIN_VERTICES, Polygon};
use crate::error::GeofenceError;

/// Editor mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Drawing,
}

/// Collects vertices while a fence is being drawn.
///
/// The editor never owns the committed fence: `finish_draw` hands the new
/// polygon back to the caller, so starting or cancelling a draft leaves
/// whatever fence is currently active alone.
#[derive(Debug, Clone, Default)]
pub struct FenceEditor {
    state: EditorState,
    draft: Vec<GeoPoint>,
}

impl FenceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == EditorState::Drawing
    }

    /// Begin a new draft, discarding any unfinished one
    pub fn start_draw(&mut self) {
        self.draft.clear();
        self.state = EditorState::Drawing;
        log::debug!("Fence drawing started");
    }

    /// Append a vertex to the draft
    ///
    /// Returns the number of vertices recorded so far.
    pub fn add_vertex(&mut self, point: GeoPoint) -> Result<usize, GeofenceError> {
        self.require_drawing()?;
        let point = point.validate()?;

        self.draft.push(point);
        log::debug!("Fence vertex {} added at {}", self.draft.len(), point);
        Ok(self.draft.len())
    }

    /// Close the draft into a polygon
    ///
    /// With fewer than three vertices the editor stays in drawing mode so the
    /// caller can keep adding points or cancel.
    pub fn finish_draw(&mut self) -> Result<Polygon, GeofenceError> {
        self.require_drawing()?;

        if self.draft.len() < MIN_VERTICES {
            return Err(GeofenceError::InsufficientVertices {
                count: self.draft.len(),
            });
        }

        let polygon = Polygon::new(std::mem::take(&mut self.draft))?;
        self.state = EditorState::Idle;
        log::info!("Fence created with {} vertices", polygon.len());
        Ok(polygon)
    }

    /// Drop the draft and return to idle
    pub fn cancel_draw(&mut self) -> Result<(), GeofenceError> {
        self.require_drawing()?;

        log::debug!("Fence drawing cancelled after {} vertices", self.draft.len());
        self.draft.clear();
        self.state = EditorState::Idle;
        Ok(())
    }

    pub fn draft(&self) -> &[GeoPoint] {
        &self.draft
    }

    pub fn vertex_count(&self) -> usize {
        self.draft.len()
    }

    pub fn can_finish(&self) -> bool {
        self.is_drawing() && self.draft.len() >= MIN_VERTICES
    }

    /// The draft as a polyline for display
    ///
    /// Empty below two vertices; once the draft could be finished the first
    /// vertex is repeated at the end to show the closing edge.
    pub fn preview(&self) -> Vec<GeoPoint> {
        if self.draft.len() < 2 {
            return Vec::new();
        }

        let mut line = self.draft.clone();
        if self.draft.len() >= MIN_VERTICES {
            line.push(self.draft[0]);
        }
        line
    }

    /// Hint for the user after the latest vertex
    pub fn prompt(&self) -> String {
        let n = self.draft.len();
        if n >= MIN_VERTICES {
            format!("Point {} added. Finish the fence or add more points.", n)
        } else {
            format!("Point {} added. Add at least {} points.", n, MIN_VERTICES)
        }
    }

    /// Arithmetic mean of the fence vertices, used to seed a tracked position
    pub fn centroid(polygon: &Polygon) -> GeoPoint {
        polygon.centroid()
    }

    fn require_drawing(&self) -> Result<(), GeofenceError> {
        if self.is_drawing() {
            Ok(())
        } else {
            Err(GeofenceError::NotDrawing)
        }
    }
}
