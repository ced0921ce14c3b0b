/// Pixel-shape path generation strategies.
///
/// A pixel shape turns a [`ModuleGrid`] into an ordered sequence of
/// [`RoundedRect`] primitives for a target canvas size. Strategies implement
/// the [`PixelShape`] trait and are constructed by name from a string-keyed
/// settings map via [`shape_named`], so a serialized style description can
/// pick its generator at load time.
///
/// The one strategy provided here is [`VerticalShape`], which merges
/// vertically contiguous modules into single tall rounded rectangles.
use log::{debug, trace};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::geometry::{GeometryParams, Rect, RoundedRect, Size};
use crate::grid::ModuleGrid;

/// Settings key for the per-side rectangle inset, in output-space units.
pub const KEY_INSET: &str = "inset";
/// Settings key for the corner radius fraction in [0, 1].
pub const KEY_CORNER_RADIUS_FRACTION: &str = "cornerRadiusFraction";

/// A path generation strategy for the ordinary modules of a QR symbol.
///
/// Implementations are value types: cloning through [`boxed_clone`] yields an
/// instance with no shared mutable state, which is the intended way to hand a
/// generator to a concurrent task while the original stays mutable.
///
/// [`boxed_clone`]: PixelShape::boxed_clone
pub trait PixelShape: std::fmt::Debug {
    /// Returns the registry name of this strategy.
    fn name(&self) -> &'static str;

    /// Generates primitives for the dark ("on") modules.
    ///
    /// With `is_template` set, the raw grid is used and the finder eyes are
    /// not masked out; this serves layout and hit-testing consumers that
    /// compose eye shapes separately. Otherwise the three eye regions are
    /// excluded from the output.
    fn on_path(&self, size: Size, grid: &ModuleGrid, is_template: bool) -> Vec<RoundedRect>;

    /// Generates primitives for the light ("off") modules. Eye regions are
    /// excluded from this pass as well unless `is_template` is set.
    fn off_path(&self, size: Size, grid: &ModuleGrid, is_template: bool) -> Vec<RoundedRect>;

    /// Returns `true` if the strategy recognizes the settings key.
    fn supports_setting(&self, key: &str) -> bool;

    /// Returns a snapshot of the strategy's parameters as a string-keyed map
    /// of JSON numbers, suitable for serialization.
    fn settings(&self) -> Map<String, Value>;

    /// Writes one parameter through the string-keyed settings surface.
    ///
    /// A `None` value resets the parameter to its zero default. A present
    /// value must be numerically parseable (a JSON number, or a string that
    /// parses as one); anything else leaves the parameter untouched and
    /// returns `false`, as does an unrecognized key.
    ///
    /// Parsed values are stored verbatim. Unlike construction, this path does
    /// not range-clamp `cornerRadiusFraction`.
    fn set_setting(&mut self, value: Option<&Value>, key: &str) -> bool;

    /// Returns a deep copy of this strategy behind a fresh box.
    fn boxed_clone(&self) -> Box<dyn PixelShape>;
}

impl Clone for Box<dyn PixelShape> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}

/// Error type for a [`shape_named`] lookup that matched no registered strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no pixel shape is registered under the name {0:?}")]
pub struct UnknownShape(pub String);

type ShapeConstructor = fn(&Map<String, Value>) -> Box<dyn PixelShape>;

fn construct_vertical(settings: &Map<String, Value>) -> Box<dyn PixelShape> {
    Box::new(VerticalShape::from_settings(settings))
}

const REGISTRY: &[(&str, ShapeConstructor)] = &[(VerticalShape::NAME, construct_vertical)];

/// Constructs a pixel shape strategy by registry name.
///
/// The settings map recognizes [`KEY_INSET`] (default 0) and
/// [`KEY_CORNER_RADIUS_FRACTION`] (default 0, clamped to [0, 1] at
/// construction); unknown keys are ignored.
///
/// # Example
///
/// ```rust
/// use qrpath::shape::shape_named;
///
/// let shape = shape_named("vertical", &serde_json::Map::new()).unwrap();
/// assert_eq!(shape.name(), "vertical");
/// ```
pub fn shape_named(
    name: &str,
    settings: &Map<String, Value>
) -> Result<Box<dyn PixelShape>, UnknownShape> {
    for (candidate, construct) in REGISTRY {
        if *candidate == name {
            debug!("constructing pixel shape {:?}", name);
            return Ok(construct(settings));
        }
    }
    Err(UnknownShape(name.to_string()))
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// The vertical run-merging pixel shape.
///
/// Scans the grid column-major and merges each maximal vertical run of lit
/// modules into a single rounded rectangle, so a solid column costs one
/// primitive instead of one per module. The outer ring of the grid (row and
/// column 0 and n−1) is the quiet ring and is never scanned; finder eyes are
/// excluded through the grid's masked view except in template mode.
///
/// Each emitted rectangle is shrunk by the configured inset per side, and its
/// corner radius is the configured fraction of half its inset width.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct VerticalShape {
    params: GeometryParams,
}

impl VerticalShape {
    /// Name under which this strategy is registered.
    pub const NAME: &'static str = "vertical";

    /// Creates the strategy with the given parameters, clamping `inset` to be
    /// non-negative and `corner_radius_fraction` to [0, 1].
    pub fn new(inset: f64, corner_radius_fraction: f64) -> Self {
        Self {
            params: GeometryParams::new(inset, corner_radius_fraction),
        }
    }

    /// Creates the strategy from a string-keyed settings map, with missing or
    /// unparseable entries defaulting to 0.
    pub fn from_settings(settings: &Map<String, Value>) -> Self {
        let inset = settings.get(KEY_INSET).and_then(parse_number).unwrap_or(0.0);
        let fraction = settings
            .get(KEY_CORNER_RADIUS_FRACTION)
            .and_then(parse_number)
            .unwrap_or(0.0);
        Self::new(inset, fraction)
    }

    /// Returns the current geometry parameters.
    pub fn params(&self) -> GeometryParams {
        self.params
    }

    fn generate(
        &self,
        size: Size,
        grid: &ModuleGrid,
        select_on: bool,
        is_template: bool
    ) -> Vec<RoundedRect> {
        let n = grid.dimension();
        if n < 3 || size.is_empty() {
            return Vec::new();
        }
        let nf = n as f64;
        // Modules stay square on a non-square canvas; the symbol is centered.
        let dm = (size.width / nf).min(size.height / nf);
        let xoff = (size.width - nf * dm) / 2.0;
        let yoff = (size.height - nf * dm) / 2.0;

        let masked;
        let source = if is_template {
            grid
        } else {
            masked = grid.masked(!select_on);
            &masked
        };

        let mut shapes: Vec<RoundedRect> = Vec::new();
        for col in 1..n - 1 {
            let mut active: Option<Rect> = None;
            for row in 1..n - 1 {
                let lit = source.value_at(row, col) == select_on;
                if !lit {
                    if let Some(run) = active.take() {
                        shapes.push(self.close_run(run));
                    }
                } else if let Some(run) = active.as_mut() {
                    run.height += dm;
                } else {
                    active = Some(Rect::new(
                        xoff + (col as f64) * dm,
                        yoff + (row as f64) * dm,
                        dm,
                        dm
                    ));
                }
            }
            if let Some(run) = active {
                shapes.push(self.close_run(run));
            }
        }
        trace!(
            "vertical shape: {} primitives for a {}x{} grid (select_on={}, template={})",
            shapes.len(),
            n,
            n,
            select_on,
            is_template
        );
        shapes
    }

    fn close_run(&self, run: Rect) -> RoundedRect {
        let inset = run.inset_by(self.params.inset);
        RoundedRect::new(inset, self.params.corner_radius_for(inset.width))
    }
}

impl PixelShape for VerticalShape {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn on_path(&self, size: Size, grid: &ModuleGrid, is_template: bool) -> Vec<RoundedRect> {
        self.generate(size, grid, true, is_template)
    }

    fn off_path(&self, size: Size, grid: &ModuleGrid, is_template: bool) -> Vec<RoundedRect> {
        self.generate(size, grid, false, is_template)
    }

    fn supports_setting(&self, key: &str) -> bool {
        key == KEY_INSET || key == KEY_CORNER_RADIUS_FRACTION
    }

    fn settings(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(KEY_INSET.to_string(), json_number(self.params.inset));
        map.insert(
            KEY_CORNER_RADIUS_FRACTION.to_string(),
            json_number(self.params.corner_radius_fraction)
        );
        map
    }

    fn set_setting(&mut self, value: Option<&Value>, key: &str) -> bool {
        let slot: &mut f64 = match key {
            KEY_INSET => &mut self.params.inset,
            KEY_CORNER_RADIUS_FRACTION => &mut self.params.corner_radius_fraction,
            _ => {
                return false;
            }
        };
        match value {
            None => {
                *slot = 0.0;
                true
            }
            Some(v) => {
                match parse_number(v) {
                    Some(parsed) => {
                        // Stored verbatim; no range clamp on this path.
                        *slot = parsed;
                        true
                    }
                    None => false,
                }
            }
        }
    }

    fn boxed_clone(&self) -> Box<dyn PixelShape> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings_map(entries: &[(&str, Value)]) -> Map<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Number of maximal contiguous lit runs per inner column of `grid`.
    fn inner_runs(grid: &ModuleGrid, lit: bool) -> usize {
        let n = grid.dimension();
        let mut runs = 0;
        for col in 1..n - 1 {
            let mut in_run = false;
            for row in 1..n - 1 {
                if grid.value_at(row, col) == lit {
                    if !in_run {
                        runs += 1;
                        in_run = true;
                    }
                } else {
                    in_run = false;
                }
            }
        }
        runs
    }

    #[test_log::test]
    fn test_template_single_run_scenario() {
        let grid = ModuleGrid::from_fn(5, |row, col| col == 2 && (1..=3).contains(&row));
        let shape = VerticalShape::new(0.0, 0.0);
        let shapes = shape.on_path(Size::new(100.0, 100.0), &grid, true);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].rect, Rect::new(40.0, 20.0, 20.0, 60.0));
        assert_eq!(shapes[0].corner_radius, 0.0);
    }

    #[test_log::test]
    fn test_primitive_count_matches_runs_per_column() {
        let grid = ModuleGrid::from_rows(&[
            vec![false, false, false, false, false, false, false],
            vec![false, true, false, true, true, false, false],
            vec![false, true, false, false, true, true, false],
            vec![false, false, false, true, false, true, false],
            vec![false, true, true, true, false, true, false],
            vec![false, true, false, false, false, true, false],
            vec![false, false, false, false, false, false, false],
        ])
        .unwrap();
        let shape = VerticalShape::new(0.0, 0.0);
        let on = shape.on_path(Size::new(70.0, 70.0), &grid, true);
        let off = shape.off_path(Size::new(70.0, 70.0), &grid, true);
        assert_eq!(on.len(), inner_runs(&grid, true));
        assert_eq!(off.len(), inner_runs(&grid, false));
    }

    #[test]
    fn test_on_and_off_template_passes_partition_inner_cells() {
        let grid = ModuleGrid::from_fn(7, |row, col| (row * 3 + col * 5) % 4 == 0);
        let shape = VerticalShape::new(0.0, 0.0);
        let dm = 10.0;
        let cells: f64 = shape
            .on_path(Size::new(70.0, 70.0), &grid, true)
            .iter()
            .chain(shape.off_path(Size::new(70.0, 70.0), &grid, true).iter())
            .map(|s| s.rect.height / dm)
            .sum();
        // 5x5 inner cells, each claimed by exactly one of the two passes.
        assert_eq!(cells, 25.0);
    }

    #[test]
    fn test_zero_params_emit_exact_run_bounds() {
        let grid = ModuleGrid::from_fn(7, |row, col| row == 3 && col == 3);
        let shape = VerticalShape::new(0.0, 0.0);
        let shapes = shape.on_path(Size::new(70.0, 70.0), &grid, true);
        assert_eq!(shapes, vec![RoundedRect::new(Rect::new(30.0, 30.0, 10.0, 10.0), 0.0)]);
    }

    #[test]
    fn test_full_fraction_single_module_inscribes_circle() {
        let grid = ModuleGrid::from_fn(5, |row, col| row == 2 && col == 2);
        let shape = VerticalShape::new(0.0, 1.0);
        let shapes = shape.on_path(Size::new(100.0, 100.0), &grid, true);
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].corner_radius, shapes[0].rect.width / 2.0);
    }

    #[test]
    fn test_inset_shrinks_and_collapse_clamps_radius() {
        let grid = ModuleGrid::from_fn(5, |row, col| row == 2 && col == 2);
        let shape = VerticalShape::new(4.0, 1.0);
        let shapes = shape.on_path(Size::new(100.0, 100.0), &grid, true);
        assert_eq!(shapes[0].rect, Rect::new(44.0, 44.0, 12.0, 12.0));
        assert_eq!(shapes[0].corner_radius, 6.0);

        // An inset of at least half a module collapses the rectangle; the
        // radius stays at zero instead of going negative.
        let collapsed = VerticalShape::new(10.0, 1.0)
            .on_path(Size::new(100.0, 100.0), &grid, true);
        assert_eq!(collapsed[0].rect.width, 0.0);
        assert_eq!(collapsed[0].corner_radius, 0.0);
    }

    #[test]
    fn test_non_square_canvas_keeps_modules_square_and_centered() {
        let grid = ModuleGrid::from_fn(5, |row, col| row == 1 && col == 1);
        let shapes = VerticalShape::new(0.0, 0.0)
            .on_path(Size::new(120.0, 100.0), &grid, true);
        assert_eq!(shapes, vec![RoundedRect::new(Rect::new(30.0, 20.0, 20.0, 20.0), 0.0)]);
    }

    #[test_log::test]
    fn test_eye_regions_never_rendered() {
        let n = 23;
        let size = Size::new(115.0, 115.0);
        let dm = 5.0;
        let span = 9.0 * dm;
        let eye_boxes = [
            Rect::new(0.0, 0.0, span, span),
            Rect::new(115.0 - span, 0.0, span, span),
            Rect::new(0.0, 115.0 - span, span, span),
        ];
        let shape = VerticalShape::new(0.0, 0.0);

        let dark = ModuleGrid::from_fn(n, |_, _| true);
        let on = shape.on_path(size, &dark, false);
        assert!(!on.is_empty());
        let light = ModuleGrid::from_fn(n, |_, _| false);
        let off = shape.off_path(size, &light, false);
        assert!(!off.is_empty());

        for primitive in on.iter().chain(off.iter()) {
            for eye in &eye_boxes {
                assert!(
                    !primitive.rect.intersects(*eye),
                    "{:?} overlaps eye box {:?}",
                    primitive.rect,
                    eye
                );
            }
        }
    }

    #[test]
    fn test_emission_order_is_column_major_top_down() {
        let grid = ModuleGrid::from_fn(7, |row, col| {
            (col == 2 && (row == 1 || row == 4)) || (col == 4 && row == 2)
        });
        let shapes = VerticalShape::new(0.0, 0.0).on_path(Size::new(70.0, 70.0), &grid, true);
        let origins: Vec<(f64, f64)> = shapes.iter().map(|s| (s.rect.x, s.rect.y)).collect();
        assert_eq!(origins, vec![(20.0, 10.0), (20.0, 40.0), (40.0, 20.0)]);
    }

    #[test]
    fn test_degenerate_inputs_give_empty_output() {
        let shape = VerticalShape::new(0.0, 0.0);
        let tiny = ModuleGrid::from_fn(2, |_, _| true);
        assert!(shape.on_path(Size::new(100.0, 100.0), &tiny, true).is_empty());
        let grid = ModuleGrid::from_fn(5, |_, _| true);
        assert!(shape.on_path(Size::new(0.0, 100.0), &grid, true).is_empty());
        assert!(shape.off_path(Size::new(100.0, 0.0), &grid, true).is_empty());
    }

    #[test]
    fn test_from_settings_defaults_and_construction_clamp() {
        let shape = VerticalShape::from_settings(&Map::new());
        assert_eq!(shape.params(), GeometryParams::new(0.0, 0.0));

        let shape = VerticalShape::from_settings(&settings_map(&[
            (KEY_INSET, json!(-2.0)),
            (KEY_CORNER_RADIUS_FRACTION, json!(3.5)),
        ]));
        assert_eq!(shape.params().inset, 0.0);
        assert_eq!(shape.params().corner_radius_fraction, 1.0);

        let shape = VerticalShape::from_settings(&settings_map(&[
            (KEY_INSET, json!("1.5")),
            (KEY_CORNER_RADIUS_FRACTION, json!(0.25)),
        ]));
        assert_eq!(shape.params(), GeometryParams::new(1.5, 0.25));
    }

    #[test]
    fn test_set_setting_reset_parse_and_failure() {
        let mut shape = VerticalShape::new(2.0, 0.5);

        assert_eq!(shape.set_setting(None, KEY_INSET), true);
        assert_eq!(shape.params().inset, 0.0);

        let bad = json!("not-a-number");
        assert_eq!(shape.set_setting(Some(&bad), KEY_INSET), false);
        assert_eq!(shape.params().inset, 0.0);

        let good = json!("3.25");
        assert_eq!(shape.set_setting(Some(&good), KEY_INSET), true);
        assert_eq!(shape.params().inset, 3.25);

        assert_eq!(shape.set_setting(Some(&json!(0.5)), "pupilShape"), false);
        assert_eq!(shape.supports_setting("pupilShape"), false);
        assert_eq!(shape.supports_setting(KEY_INSET), true);

        // The setter stores out-of-range fractions verbatim.
        assert_eq!(shape.set_setting(Some(&json!(4.2)), KEY_CORNER_RADIUS_FRACTION), true);
        assert_eq!(shape.params().corner_radius_fraction, 4.2);
    }

    #[test]
    fn test_settings_snapshot() {
        let shape = VerticalShape::new(1.0, 0.75);
        let map = shape.settings();
        assert_eq!(map.len(), 2);
        assert_eq!(map[KEY_INSET], json!(1.0));
        assert_eq!(map[KEY_CORNER_RADIUS_FRACTION], json!(0.75));
    }

    #[test]
    fn test_boxed_clone_is_independent() {
        let original = VerticalShape::new(1.0, 0.5);
        let boxed: Box<dyn PixelShape> = Box::new(original.clone());
        let mut copy = boxed.clone();
        assert_eq!(copy.set_setting(Some(&json!(9.0)), KEY_INSET), true);
        assert_eq!(copy.settings()[KEY_INSET], json!(9.0));
        assert_eq!(boxed.settings()[KEY_INSET], json!(1.0));
        assert_eq!(original.params().inset, 1.0);
    }

    #[test]
    fn test_shape_named_registry() {
        let settings = settings_map(&[(KEY_INSET, json!(0.5))]);
        let shape = shape_named(VerticalShape::NAME, &settings).unwrap();
        assert_eq!(shape.name(), "vertical");
        assert_eq!(shape.settings()[KEY_INSET], json!(0.5));

        let err = shape_named("hexagon", &Map::new()).unwrap_err();
        assert_eq!(err, UnknownShape("hexagon".to_string()));
    }
}
