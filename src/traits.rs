//! conversions from raw sample types to the working precision

use num_complex::Complex;

/// real valued samples, e.g. wideband digitizer output before beamforming
pub trait ToReal: Copy {
    fn to_real(&self) -> f64;
}

/// samples that can be mixed to baseband
pub trait ToComplex: Copy {
    fn to_complex(&self) -> Complex<f64>;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl ToReal for $t {
                fn to_real(&self) -> f64 {
                    f64::from(*self)
                }
            }

            impl ToComplex for $t {
                fn to_complex(&self) -> Complex<f64> {
                    Complex::new(f64::from(*self), 0.0)
                }
            }
        )*
    };
}

impl_sample!(i8, i16, i32, f32, f64);

impl<T> ToComplex for Complex<T>
where
    T: ToReal,
{
    fn to_complex(&self) -> Complex<f64> {
        Complex::new(self.re.to_real(), self.im.to_real())
    }
}
