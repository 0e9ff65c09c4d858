//! # Data handed to the rendering side
//!
//! The core produces `PlotData`: labelled point series (one per phase segment) and an optional
//! melting point annotation. Renderers only read it, nothing is accumulated between calls.
//! Renderers:
//! - `TableRenderer`: prettytable summary in the terminal
//! - `DataFileRenderer`: whitespace separated columns for external plotting tools
//! - `PlotRenderer`: both phases on one chart with the RustedSciThe plotting helpers
use crate::Thermodynamics::MeltingPoint::MeltingPoint;
use crate::Thermodynamics::gibbs_error::GibbsError;
use crate::Thermodynamics::sampled_curve::{SampledCurve, interpolate_sorted};
use RustedSciThe::Utils::plots::{plots, plots_gnulot};
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Table, row};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const PLOT_TITLE: &str = "Gibbs Free Energy vs. Temperature";
pub const X_LABEL: &str = "Temperature (K)";
pub const Y_LABEL: &str = "Gibbs Free Energy (J/mol)";
/// offset of the annotation text from the melting point, (K, J/mol)
const ANNOTATION_OFFSET: (f64, f64) = (50.0, 200.0);

#[derive(Debug, Clone, PartialEq)]
pub struct CurveSeries {
    /// empty label = no legend entry
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl From<&SampledCurve> for CurveSeries {
    fn from(curve: &SampledCurve) -> Self {
        Self {
            label: curve.label.clone(),
            points: curve.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeltingAnnotation {
    pub point: MeltingPoint,
    pub label: String,
    pub text_position: (f64, f64),
    /// dashed vertical and horizontal lines through the point
    pub crosshair: bool,
}

impl From<MeltingPoint> for MeltingAnnotation {
    fn from(point: MeltingPoint) -> Self {
        Self {
            point,
            label: point.to_string(),
            text_position: (
                point.temperature + ANNOTATION_OFFSET.0,
                point.energy + ANNOTATION_OFFSET.1,
            ),
            crosshair: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<CurveSeries>,
    pub annotation: Option<MeltingAnnotation>,
}

impl PlotData {
    pub fn new(series: Vec<CurveSeries>, melting_point: Option<MeltingPoint>) -> Self {
        Self {
            title: PLOT_TITLE.to_string(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            series,
            annotation: melting_point.map(MeltingAnnotation::from),
        }
    }
    /// labels shown in the legend
    pub fn legend(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .series
            .iter()
            .map(|s| s.label.as_str())
            .filter(|l| !l.is_empty())
            .collect();
        if let Some(annotation) = &self.annotation {
            labels.push(annotation.label.as_str());
        }
        labels
    }
}

/// consumer of finished plot data
pub trait CurveRenderer {
    fn render(&self, plot: &PlotData) -> Result<(), GibbsError>;
}

/// prints every `stride`-th point of each series as a table
#[derive(Debug, Clone)]
pub struct TableRenderer {
    pub stride: usize,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self { stride: 100 }
    }
}

impl TableRenderer {
    pub fn build_tables(&self, plot: &PlotData) -> Vec<Table> {
        let stride = self.stride.max(1);
        let mut tables = Vec::new();
        for (i, series) in plot.series.iter().enumerate() {
            let mut table = Table::new();
            let name = if series.label.is_empty() {
                format!("segment {}", i)
            } else {
                series.label.clone()
            };
            table.add_row(row![name]);
            table.add_row(row![plot.x_label, plot.y_label]);
            let last = series.points.len().saturating_sub(1);
            for (j, (t, g)) in series.points.iter().enumerate() {
                if j % stride == 0 || j == last {
                    table.add_row(row![format!("{:.3}", t), format!("{:.3}", g)]);
                }
            }
            tables.push(table);
        }
        if let Some(annotation) = &plot.annotation {
            let mut table = Table::new();
            table.add_row(row![annotation.label]);
            table.add_row(row!["T, K", "G, J/mol"]);
            table.add_row(row![annotation.point.temperature, annotation.point.energy]);
            tables.push(table);
        }
        tables
    }
}

impl CurveRenderer for TableRenderer {
    fn render(&self, plot: &PlotData) -> Result<(), GibbsError> {
        println!("__________{}__________", plot.title);
        for table in self.build_tables(plot) {
            table.printstd();
        }
        if plot.annotation.is_none() {
            println!("no melting point found in the sampled domain");
        }
        println!("_____________________________________________________________");
        Ok(())
    }
}

/// writes all series into one text file, blank line separated blocks
#[derive(Debug, Clone)]
pub struct DataFileRenderer {
    pub path: PathBuf,
}

impl DataFileRenderer {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CurveRenderer for DataFileRenderer {
    fn render(&self, plot: &PlotData) -> Result<(), GibbsError> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        writeln!(file, "# {}", plot.title)?;
        writeln!(file, "# {}\t{}", plot.x_label, plot.y_label)?;
        if let Some(annotation) = &plot.annotation {
            writeln!(
                file,
                "# {}\t{}\t{}",
                annotation.label, annotation.point.temperature, annotation.point.energy
            )?;
        }
        for series in &plot.series {
            writeln!(file)?;
            writeln!(file, "# series: {}", series.label)?;
            for (t, g) in &series.points {
                writeln!(file, "{}\t{}", t, g)?;
            }
        }
        file.flush()?;
        Ok(())
    }
}

/// Draws G(T) of every phase on one chart.
/// A labelled series starts a phase, unlabelled series continue it. All phases share one
/// temperature grid: every sample temperature inside the span common to all phases.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlotRenderer {
    /// gnuplot window instead of the plotters picture
    pub gnuplot: bool,
}

impl PlotRenderer {
    pub fn new(gnuplot: bool) -> Self {
        Self { gnuplot }
    }

    fn phases(plot: &PlotData) -> Vec<SampledCurve> {
        let mut phases: Vec<SampledCurve> = Vec::new();
        for series in &plot.series {
            let points = series.points.iter().copied();
            if series.label.is_empty() {
                if let Some(phase) = phases.last_mut() {
                    phase.extend(points);
                    continue;
                }
            }
            phases.push(SampledCurve::from_points(&series.label, points));
        }
        phases
    }
    /// (phase names, temperature grid, G matrix with one column per phase)
    pub fn columns(
        plot: &PlotData,
    ) -> Result<(Vec<String>, DVector<f64>, DMatrix<f64>), GibbsError> {
        let phases = Self::phases(plot);
        let mut common: Option<(f64, f64)> = None;
        for phase in &phases {
            let (lo, hi) = phase
                .span()
                .ok_or_else(|| GibbsError::NothingToPlot(format!("'{}' is empty", phase.label)))?;
            common = Some(match common {
                None => (lo, hi),
                Some((c_lo, c_hi)) => (c_lo.max(lo), c_hi.min(hi)),
            });
        }
        let (lo, hi) = match common {
            Some((lo, hi)) if lo <= hi => (lo, hi),
            Some(_) => {
                return Err(GibbsError::NothingToPlot(
                    "phases have no common temperature span".to_string(),
                ));
            }
            None => return Err(GibbsError::NothingToPlot("no series".to_string())),
        };

        let mut grid: Vec<f64> = phases
            .iter()
            .flat_map(|phase| phase.temperatures())
            .filter(|t| lo <= *t && *t <= hi)
            .collect();
        grid.sort_by(|a, b| a.total_cmp(b));
        grid.dedup();

        let mut values: Vec<Vec<f64>> = Vec::with_capacity(phases.len());
        for phase in &phases {
            let sorted = phase.sorted_points();
            let column = grid
                .iter()
                .map(|&t| {
                    interpolate_sorted(&sorted, t).ok_or_else(|| {
                        GibbsError::NothingToPlot(format!(
                            "'{}' has no value at {} K",
                            phase.label, t
                        ))
                    })
                })
                .collect::<Result<Vec<f64>, GibbsError>>()?;
            values.push(column);
        }
        let names = phases.iter().map(|phase| phase.label.clone()).collect();
        let y = DMatrix::from_fn(grid.len(), phases.len(), |row, col| values[col][row]);
        Ok((names, DVector::from_vec(grid), y))
    }
}

impl CurveRenderer for PlotRenderer {
    fn render(&self, plot: &PlotData) -> Result<(), GibbsError> {
        let (names, x, y) = Self::columns(plot)?;
        if let Some(annotation) = &plot.annotation {
            info!(
                "{}, G = {} J/mol",
                annotation.label, annotation.point.energy
            );
        }
        let arg = "T".to_owned();
        if self.gnuplot {
            plots_gnulot(arg, names, x, y);
        } else {
            plots(arg, names, x, y);
        }
        Ok(())
    }
}
