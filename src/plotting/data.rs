//! Column data accepted by the drawing builders.
//!
//! Series keep their columns in single precision; the canvas works in `f64`.

pub trait IntoPlotData {
    fn into_plot_data(self) -> Vec<f64>;
}

impl<T: Into<f64>> IntoPlotData for Vec<T> {
    fn into_plot_data(self) -> Vec<f64> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Copy + Into<f64>> IntoPlotData for &[T] {
    fn into_plot_data(self) -> Vec<f64> {
        self.iter().map(|&v| v.into()).collect()
    }
}

impl<T: Copy + Into<f64>> IntoPlotData for &Vec<T> {
    fn into_plot_data(self) -> Vec<f64> {
        self.as_slice().into_plot_data()
    }
}

impl<T: Into<f64>, const N: usize> IntoPlotData for [T; N] {
    fn into_plot_data(self) -> Vec<f64> {
        self.into_iter().map(Into::into).collect()
    }
}
