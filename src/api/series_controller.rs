use serde_json::Value;
use tracing::debug;

use crate::core::ShapeDataset;
use crate::error::{ChartError, ChartResult};
use crate::extensions::PluginEvent;
use crate::render::Renderer;
use crate::series::{MapSeries, MapSeriesOptions, SeriesKind, SeriesType};

use super::ChartEngine;

impl<R: Renderer> ChartEngine<R> {
    /// Adds a map series joining `values` onto `shapes`. Returns its index.
    pub fn add_map_series(
        &mut self,
        id: &str,
        options: MapSeriesOptions,
        values: Vec<Value>,
        shapes: ShapeDataset,
    ) -> ChartResult<usize> {
        let mut series = MapSeries::new(id, options)?;
        series.set_data(values, shapes);
        self.push_series(Box::new(series))
    }

    /// Builds a series of `series_type` from its JSON definition.
    pub fn add_series(
        &mut self,
        series_type: SeriesType,
        id: &str,
        definition: &Value,
    ) -> ChartResult<usize> {
        let series = series_type.build(id, definition)?;
        self.push_series(series)
    }

    /// Adds an already built series. Returns its index.
    ///
    /// A map series switches the y axis to reversed if it was not already.
    pub fn push_series(&mut self, series: Box<dyn SeriesKind>) -> ChartResult<usize> {
        if self.series_index(series.id()).is_some() {
            return Err(ChartError::InvalidConfig(format!(
                "series with id `{}` already exists",
                series.id()
            )));
        }
        if series.series_type() == SeriesType::Map && !self.axes.y.is_reversed() {
            // Map plane y grows downward.
            debug!(series = series.id(), "reversing y axis for map series");
            self.axes.y = self.axes.y.with_reversed(true);
            self.config.y_axis.reversed = true;
        }
        let series_index = self.series.len();
        debug!(
            series = series.id(),
            series_type = ?series.series_type(),
            series_index,
            "added series"
        );
        self.series.push(series);
        self.emit_data_updated(series_index);
        Ok(series_index)
    }

    /// Removes a series by id. Returns `true` when removed.
    pub fn remove_series(&mut self, id: &str) -> bool {
        match self.series_index(id) {
            Some(index) => {
                self.series.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn series_index(&self, id: &str) -> Option<usize> {
        self.series.iter().position(|series| series.id() == id)
    }

    #[must_use]
    pub fn series(&self, id: &str) -> Option<&dyn SeriesKind> {
        self.series
            .iter()
            .find(|series| series.id() == id)
            .map(|series| series.as_ref())
    }

    /// Typed access to a series, e.g. `engine.series_as::<MapSeries>("map")`.
    #[must_use]
    pub fn series_as<T: SeriesKind>(&self, id: &str) -> Option<&T> {
        self.series(id)?.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn map_series(&self, id: &str) -> Option<&MapSeries> {
        self.series_as::<MapSeries>(id)
    }

    /// Replaces the values of a map series, keeping its shapes.
    pub fn set_map_values(&mut self, id: &str, values: Vec<Value>) -> ChartResult<()> {
        let index = self
            .series_index(id)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown series `{id}`")))?;
        let series = self.series[index]
            .as_any_mut()
            .downcast_mut::<MapSeries>()
            .ok_or_else(|| ChartError::InvalidData(format!("series `{id}` is not a map")))?;
        series.set_values(values);
        self.emit_data_updated(index);
        Ok(())
    }

    fn emit_data_updated(&mut self, series_index: usize) {
        let points_len = self
            .series
            .get(series_index)
            .map_or(0, |series| series.point_count());
        self.emit_plugin_event(PluginEvent::DataUpdated {
            series_index,
            points_len,
        });
    }
}
