use super::InitialConditionner;
use crate::field::Distributed2DField;
use crate::message::Communicator;




/**
 * Sets every value of the field, ghosts included, to a constant.
 */
pub struct UniformInitializer {
    value: f64,
}

impl UniformInitializer {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl<C> InitialConditionner<C> for UniformInitializer {
    fn initial_condition(&self, field: &mut Distributed2DField<C>) {
        field.full_view_mut().fill(self.value)
    }
}




/**
 * A disc of hot cells centred in the global domain, on a uniform cold
 * background. The ghosts are set to the background value, so the physical
 * boundary is held at the cold temperature.
 */
pub struct HotSpotInitializer {
    cold: f64,
    hot: f64,
    radius: f64,
}

impl HotSpotInitializer {
    /// `radius` is a fraction of the smaller side of the global domain.
    pub fn new(cold: f64, hot: f64, radius: f64) -> Self {
        Self { cold, hot, radius }
    }
}

impl<C: Communicator> InitialConditionner<C> for HotSpotInitializer {
    fn initial_condition(&self, field: &mut Distributed2DField<C>) {
        let [dy, dx] = field.delta_space();
        let global = field.global_shape();
        let offset = field.global_offset();
        let (ly, lx) = (global.y() as f64 * dy, global.x() as f64 * dx);
        let r = self.radius * ly.min(lx);
        let (cold, hot) = (self.cold, self.hot);

        field.full_view_mut().fill(cold);
        field.noghost_view_mut().fill_with(|y, x| {
            let py = ((offset.y() + y) as f64 + 0.5) * dy - 0.5 * ly;
            let px = ((offset.x() + x) as f64 + 0.5) * dx - 0.5 * lx;
            if py * py + px * px < r * r { hot } else { cold }
        });
    }
}
