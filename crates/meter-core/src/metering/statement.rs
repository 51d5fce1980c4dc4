use crate::entities::Customer;

/// Render the bill for a customer's cumulative consumption at `price` per unit
pub fn render_bill(customer: &Customer, price: f64) -> String {
    let units = customer.units_consumed();
    let amount = units * price;
    format!(
        "You have used {} units, please pay {} rupees to continue using our service.",
        format_decimal(units),
        format_decimal(amount)
    )
}

/// Format a float the way a bill shows it
///
/// Whole numbers keep one decimal place (`5.0`); anything else uses the
/// shortest representation that round-trips, with no currency rounding.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
