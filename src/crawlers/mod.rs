//! Everything that talks to the browser: the WebDriver session, the page
//! driver seam, client-state probes and the product and shop flows.

pub mod driver;
pub mod probe;
pub mod product;
pub mod scripts;
pub mod session;
pub mod shop;

#[cfg(test)]
mod tests;
