use ndarray::{Array1, Zip};

/// RMSProp without momentum or centering.
///
/// `velocity = rho * velocity + (1 - rho) * g^2`, then
/// `w -= lr * g / (sqrt(velocity) + epsilon)`.
#[derive(Debug, Clone)]
pub struct RmsProp {
    learning_rate: f64,
    rho: f64,
    epsilon: f64,
    kernel_velocity: Array1<f64>,
    bias_velocity: f64,
}

impl RmsProp {
    pub fn new(learning_rate: f64, rho: f64, epsilon: f64, n_weights: usize) -> Self {
        RmsProp {
            learning_rate,
            rho,
            epsilon,
            kernel_velocity: Array1::zeros(n_weights),
            bias_velocity: 0.0,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Apply one update to `kernel` and `bias` from their gradients.
    pub fn step(
        &mut self,
        kernel: &mut Array1<f64>,
        bias: &mut f64,
        kernel_grad: &Array1<f64>,
        bias_grad: f64,
    ) {
        let (lr, rho, eps) = (self.learning_rate, self.rho, self.epsilon);

        Zip::from(kernel)
            .and(&mut self.kernel_velocity)
            .and(kernel_grad)
            .for_each(|w, v, &g| {
                *v = rho * *v + (1.0 - rho) * g * g;
                *w -= lr * g / (v.sqrt() + eps);
            });

        self.bias_velocity = rho * self.bias_velocity + (1.0 - rho) * bias_grad * bias_grad;
        *bias -= lr * bias_grad / (self.bias_velocity.sqrt() + eps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_is_scaled_by_root_one_minus_rho() {
        let mut opt = RmsProp::new(0.001, 0.9, 0.0, 1);
        let mut kernel = Array1::from(vec![0.0]);
        let mut bias = 0.0;
        opt.step(&mut kernel, &mut bias, &Array1::from(vec![2.0]), -2.0);
        // v = 0.1 * 4, step = lr * 2 / sqrt(0.4)
        let expected = 0.001 * 2.0 / 0.4f64.sqrt();
        assert!((kernel[0] + expected).abs() < 1e-12);
        assert!((bias - expected).abs() < 1e-12);
    }

    #[test]
    fn epsilon_is_added_after_the_square_root() {
        let mut opt = RmsProp::new(1.0, 0.0, 0.5, 1);
        let mut kernel = Array1::from(vec![0.0]);
        let mut bias = 0.0;
        opt.step(&mut kernel, &mut bias, &Array1::from(vec![2.0]), 4.0);
        // v = g^2, step = g / (|g| + 0.5)
        assert!((kernel[0] + 2.0 / 2.5).abs() < 1e-12);
        assert!((bias + 4.0 / 4.5).abs() < 1e-12);
    }

    #[test]
    fn zero_gradient_leaves_weights_alone() {
        let mut opt = RmsProp::new(0.1, 0.9, 1e-7, 2);
        let mut kernel = Array1::from(vec![0.5, -0.5]);
        let mut bias = 0.25;
        opt.step(&mut kernel, &mut bias, &Array1::zeros(2), 0.0);
        assert_eq!(kernel, Array1::from(vec![0.5, -0.5]));
        assert_eq!(bias, 0.25);
    }
}
