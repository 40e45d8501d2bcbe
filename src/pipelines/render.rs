// src/pipelines/render.rs

//! Renders operator messages and buyer emails from the current order row.

use crate::config::AppConfig;
use crate::models::order::Order;

/// Thousands-grouped amount, cents shown only when the amount has any.
pub fn format_amount(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = cents / 100;
  let fraction = cents % 100;

  let digits = whole.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }

  if fraction > 0 {
    format!("{}.{:02}", grouped, fraction)
  } else {
    grouped
  }
}

fn order_field_lines(order: &Order) -> String {
  format!(
    "📦 *Order Number:* `{}`\n\
     👤 *Buyer:* {} {}\n\
     📧 *Email:* {}\n\
     📱 *Phone:* {}\n\
     🏠 *Shipping Address:*\n   {}, {}, {} {}\n\
     💰 *Total Amount:* Rp {}\n\
     🖼️ *Payment Proof:* [View Here]({})\n\
     ⏳ *Status:* {}\n\
     📅 *Order Date:* {}",
    order.order_number,
    order.first_name,
    order.last_name,
    order.email,
    order.phone,
    order.address,
    order.city,
    order.state,
    order.zip_code,
    format_amount(order.amount),
    order.payment_proof_url,
    order.status.label(),
    order.created_at.format("%d %b %Y %H:%M"),
  )
}

pub fn operator_alert_text(order: &Order) -> String {
  format!("🎉 *New Order Alert!* 🎉\n{}", order_field_lines(order))
}

pub fn operator_update_text(order: &Order) -> String {
  format!("🎉 *Order Update!* 🎉\n{}", order_field_lines(order))
}

/// Subject and HTML body for the buyer's confirmation email.
pub fn confirmation_email(config: &AppConfig, order: &Order) -> (String, String) {
  let subject = "Your Order Has Been Confirmed!".to_string();
  let html = format!(
    r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #2ecc71;">Order Confirmed! 🎉</h2>
  <p>Hi {first_name},</p>
  <p>We're excited to let you know that your order has been confirmed! Your {product} will be shipped soon.</p>
  <h3>Order Details</h3>
  <p><strong>Order Number:</strong> {number}</p>
  <p><strong>Product:</strong> {product}</p>
  <p><strong>Amount:</strong> Rp {amount}</p>
  <p><strong>Shipping Address:</strong> {address}, {city}, {state} {zip}</p>
  <p>If you have any questions, feel free to reply to this email.</p>
  <p>Thank you for shopping with {shop}!</p>
  <p>Best regards,<br>The {shop} Team</p>
</div>"#,
    first_name = order.first_name,
    product = config.product_name,
    number = order.order_number,
    amount = format_amount(order.amount),
    address = order.address,
    city = order.city,
    state = order.state,
    zip = order.zip_code,
    shop = config.shop_name,
  );
  (subject, html)
}

/// Subject and HTML body for the buyer's rejection email.
pub fn rejection_email(config: &AppConfig, order: &Order) -> (String, String) {
  let subject = "Your Order Has Been Rejected".to_string();
  let html = format!(
    r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #e74c3c;">Order Rejected</h2>
  <p>Hi {first_name},</p>
  <p>We're sorry to inform you that your order has been rejected. This might be due to an issue with the payment proof or other verification steps.</p>
  <h3>Order Details</h3>
  <p><strong>Order Number:</strong> {number}</p>
  <p><strong>Product:</strong> {product}</p>
  <p><strong>Amount:</strong> Rp {amount}</p>
  <p>Please contact us for more information or to resubmit your order.</p>
  <p>Best regards,<br>The {shop} Team</p>
</div>"#,
    first_name = order.first_name,
    number = order.order_number,
    product = config.product_name,
    amount = format_amount(order.amount),
    shop = config.shop_name,
  );
  (subject, html)
}
