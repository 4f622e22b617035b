//! Turning page data into product records: [`state`] handles structured
//! client-state objects, [`html`] handles rendered markup.

pub mod html;
pub mod state;

#[cfg(test)]
mod tests;
