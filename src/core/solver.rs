pub const IRR_MAX_ITERATIONS: u32 = 1000;
pub const IRR_TOLERANCE: f64 = 1e-5;
pub const IRR_DEFAULT_GUESS: f64 = 0.1;
const IRR_MIN_RATE: f64 = -0.99;
const IRR_MAX_RATE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolve {
    pub rate: f64,
    pub iterations: u32,
    pub converged: bool,
}

pub fn solve_irr(cashflows: &[f64], initial_guess: f64) -> IrrSolve {
    let mut rate = initial_guess;

    for iteration in 1..=IRR_MAX_ITERATIONS {
        let (npv, derivative) = npv_with_derivative(cashflows, rate);
        if derivative == 0.0 || !derivative.is_finite() {
            return IrrSolve {
                rate,
                iterations: iteration,
                converged: false,
            };
        }

        let next_rate = rate - npv / derivative;
        if (next_rate - rate).abs() < IRR_TOLERANCE {
            return IrrSolve {
                rate: next_rate,
                iterations: iteration,
                converged: true,
            };
        }
        // Keep the iterate inside (-1, inf) so a large step cannot run off.
        rate = next_rate.clamp(IRR_MIN_RATE, IRR_MAX_RATE);
    }

    IrrSolve {
        rate,
        iterations: IRR_MAX_ITERATIONS,
        converged: false,
    }
}

pub fn internal_rate_of_return(cashflows: &[f64], initial_guess: f64) -> f64 {
    let solve = solve_irr(cashflows, initial_guess);
    if !solve.converged {
        log::warn!(
            "IRR did not converge after {} iterations (last rate {})",
            solve.iterations,
            solve.rate
        );
    }
    solve.rate
}

fn npv_with_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, derivative), (j, &cf)| {
            let j = j as f64;
            (
                npv + cf / (1.0 + rate).powf(j),
                derivative - j * cf / (1.0 + rate).powf(j + 1.0),
            )
        })
}
