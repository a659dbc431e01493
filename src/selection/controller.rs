use super::model::{FileSaver, MapSurface, Notice, Presenter};
use crate::{
    conf::Conf,
    feasibility::{self, FeasibilityResult},
    zone::{style, LoadReport, ZoneDataset, ZoneFeature},
    Error, Result,
};
use geo::Coord;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

/// Boundary between the map widget and the feasibility pipeline.
///
/// The map handle is owned by the controller and released either explicitly
/// with [`SelectionController::release`] or on drop. Events are handled
/// synchronously in delivery order, each successful selection replaces the
/// previous result.
pub struct SelectionController<M: MapSurface, P: Presenter, S: FileSaver> {
    dataset: Rc<ZoneDataset>,
    map: Option<M>,
    layers_registered: bool,
    presenter: P,
    saver: S,
    conf: Conf,
    current: Option<FeasibilityResult>,
}

impl<M: MapSurface, P: Presenter, S: FileSaver> SelectionController<M, P, S> {
    pub fn new(dataset: Rc<ZoneDataset>, map: M, presenter: P, saver: S, conf: Conf) -> Self {
        SelectionController {
            dataset,
            map: Some(map),
            layers_registered: false,
            presenter,
            saver,
            conf,
            current: None,
        }
    }

    /// Hands the dataset document and the zone layers to the map. Calling it
    /// again after a success is a no-op, calling it after a failure adds
    /// whatever is still missing.
    pub fn register_source(&mut self) -> Result<()> {
        let source_id = self.conf.source_id.clone();
        let map = self.map.as_mut().ok_or("Map has been released")?;
        if self.layers_registered {
            debug!(source_id = %source_id, "Source already registered");
            return Ok(());
        }
        if !map.has_source(&source_id) {
            map.add_source(&source_id, &self.dataset.export())?;
        }
        map.add_zone_layers(
            &source_id,
            &style::fill_color_expression(&self.dataset),
            style::OUTLINE_COLOR,
        )
        .inspect_err(|e| {
            warn!(source_id = %source_id, error = %e, "Failed to add zone layers");
        })?;
        self.layers_registered = true;
        info!(
            source_id = %source_id,
            features = self.dataset.len(),
            "Registered zone source"
        );
        Ok(())
    }

    /// Tells the user how many features were dropped while loading the
    /// dataset, if any.
    pub fn report_load(&mut self, report: &LoadReport) {
        if let Some(err) = report.error() {
            warn!(loaded = report.loaded, error = %err, "Zone dataset loaded partially");
            self.notify(Notice::warning(format!(
                "{} zone feature(s) were malformed and not loaded",
                report.rejected.len()
            )));
        }
    }

    /// Evaluates a single clicked feature. Geometry that can't produce an
    /// area is ignored and the previous result stays in place.
    pub fn on_feature_clicked(
        &mut self,
        feature: &ZoneFeature,
        coord: Coord,
    ) -> Option<&FeasibilityResult> {
        let result = match feasibility::evaluate(feature) {
            Ok(result) => result,
            Err(e) => {
                warn!(feature_id = %feature.id, error = %e, "Ignoring selection");
                return None;
            }
        };
        debug!(
            feature_id = %result.feature_id,
            area = result.area_sq_meters,
            built_area = result.built_area_sq_meters,
            "Evaluated selection"
        );
        self.presenter.present(&result);
        if let Some(map) = self.map.as_mut() {
            map.show_popup(coord, &result.popup_html());
        }
        self.current = Some(result);
        self.current.as_ref()
    }

    /// Resolves the features the map found under the pointer to the topmost
    /// one, which is the last one in dataset order.
    pub fn on_features_clicked<I: AsRef<str>>(
        &mut self,
        candidate_ids: &[I],
        coord: Coord,
    ) -> Option<&FeasibilityResult> {
        let dataset = Rc::clone(&self.dataset);
        let topmost = candidate_ids
            .iter()
            .filter_map(|id| {
                let position = dataset.position(id.as_ref());
                if position.is_none() {
                    warn!(feature_id = id.as_ref(), "Unknown feature under pointer");
                }
                position
            })
            .max()?;
        self.on_feature_clicked(&dataset.features()[topmost], coord)
    }

    /// Looks the zone up in the dataset itself, for maps that can't hit-test
    pub fn on_map_clicked(&mut self, coord: Coord) -> Option<&FeasibilityResult> {
        let dataset = Rc::clone(&self.dataset);
        let Some(feature) = dataset.find_at(coord) else {
            self.notify(Notice::warning("Nenhuma zona encontrada neste ponto."));
            return None;
        };
        if self.on_feature_clicked(feature, coord).is_none() {
            return None;
        }
        self.notify(Notice::success(format!(
            "Zona identificada no clique! Lat: {:.5}, Lon: {:.5}",
            coord.y, coord.x
        )));
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&FeasibilityResult> {
        self.current.as_ref()
    }

    pub fn dataset(&self) -> &ZoneDataset {
        &self.dataset
    }

    pub fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[cfg(test)]
    pub fn saver(&self) -> &S {
        &self.saver
    }

    /// Serializes the dataset and passes it to the file saver. Requires the
    /// source and its layers to be registered with the map first.
    pub fn export_current_dataset(&mut self) -> Result<()> {
        let source_id = &self.conf.source_id;
        let registered = self.layers_registered
            && self
                .map
                .as_ref()
                .map(|it| it.has_source(source_id))
                .unwrap_or(false);
        if !registered {
            let err = Error::MissingSource(format!("Source {source_id} is not registered"));
            warn!(error = %err, "Can't export zones");
            self.notify(Notice::warning(err.to_string()));
            return Err(err);
        }
        let document = self.dataset.export_string()?;
        let file_name = self.conf.export_file_name.clone();
        match self.saver.save(&file_name, document.as_bytes()) {
            Ok(()) => {
                info!(file_name = %file_name, bytes = document.len(), "Exported zones");
                self.notify(Notice::success(format!(
                    "Exported {} zones to {file_name}",
                    self.dataset.len()
                )));
                Ok(())
            }
            Err(e) => {
                error!(file_name = %file_name, error = %e, "Failed to export zones");
                self.notify(Notice::error(format!("Failed to export zones: {e}")));
                Err(e)
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        debug!(level = %notice.level, "{}", notice.message);
        self.presenter.notify(notice);
    }

    pub fn release(&mut self) {
        if let Some(mut map) = self.map.take() {
            map.release();
            info!("Released map");
        }
    }
}

impl<M: MapSurface, P: Presenter, S: FileSaver> Drop for SelectionController<M, P, S> {
    fn drop(&mut self) {
        self.release();
    }
}
