//! JavaScript executed in the page through WebDriver `execute`.
//!
//! Each script is a function body: WebDriver passes arguments as
//! `arguments[n]` and serializes the returned value back as JSON.

/// Product object from `window.__INITIAL_STATE__`
pub const INITIAL_STATE_PRODUCT: &str = r#"
const state = window.__INITIAL_STATE__;
if (!state) return null;
if (state.pdp && state.pdp.data) return state.pdp.data;
return state.product || null;
"#;

/// Product object from the Nuxt store in `window.__NUXT__`
pub const NUXT_PRODUCT: &str = r#"
const state = window.__NUXT__ && window.__NUXT__.state;
if (!state) return null;
if (state.pdp && state.pdp.data) return state.pdp.data;
return state.product || null;
"#;

/// Product object from hydrated `window.__NEXT_DATA__` page props
pub const NEXT_DATA_PRODUCT: &str = r#"
const data = window.__NEXT_DATA__;
if (!data || !data.props || !data.props.pageProps) return null;
return data.props.pageProps.product || null;
"#;

/// Arrays of products anywhere in the known client states.
///
/// An array counts only when every object has an id, a title and a product
/// signal (`productId`, a price, `photos` or a `/product/` URL), so category
/// menus are passed over. Returns `[{productId, title, url}]`.
pub const PRODUCT_LINKS: &str = r#"
const roots = [
  window.__INITIAL_STATE__,
  window.__NUXT__ && window.__NUXT__.state,
  window.__NEXT_DATA__ && window.__NEXT_DATA__.props,
];
const seen = new Set();
const found = [];
const productUrl = (o) => ['url', 'link', 'href']
  .map((key) => o[key])
  .find((value) => typeof value === 'string' && value.includes('/product/'));
const hasProductSignal = (o) => o.productId !== undefined
  || o.sellPrice !== undefined || o.price !== undefined || o.fullPrice !== undefined
  || Array.isArray(o.photos)
  || productUrl(o) !== undefined;
const isProduct = (o) => o && typeof o === 'object' && !Array.isArray(o)
  && (o.productId !== undefined || o.id !== undefined)
  && (o.title !== undefined || o.name !== undefined)
  && hasProductSignal(o);
const walk = (node, depth) => {
  if (!node || typeof node !== 'object' || depth > 8 || seen.has(node)) return;
  seen.add(node);
  if (Array.isArray(node)) {
    if (node.length > 0 && node.every(isProduct)) {
      for (const item of node) {
        found.push({
          productId: item.productId !== undefined ? item.productId : item.id,
          title: item.title !== undefined ? item.title : item.name,
          url: productUrl(item) || null,
        });
      }
      return;
    }
    for (const item of node) walk(item, depth + 1);
    return;
  }
  for (const key of Object.keys(node)) walk(node[key], depth + 1);
};
for (const root of roots) walk(root, 0);
return found;
"#;

/// Scrolls to the bottom to trigger lazy loading; returns the page height
pub const SCROLL_TO_BOTTOM: &str = r#"
window.scrollTo(0, document.body.scrollHeight);
return document.body.scrollHeight;
"#;

/// Finds the next-page control in ru, uz or en; clicks it when `arguments[0]` is true
pub const NEXT_PAGE: &str = r#"
const click = arguments[0] === true;
const texts = ['→', '›', 'Next', 'Следующая', 'Keyingi'];
const labels = ['Next page', 'Следующая страница', 'Keyingi sahifa'];
const candidates = document.querySelectorAll(
  '.pagination a, .page-navigation a, .pager a, [class*="pagination"] button'
);
for (const elem of candidates) {
  const text = (elem.textContent || '').trim();
  const label = elem.getAttribute('aria-label');
  if (texts.includes(text) || labels.includes(label) || elem.classList.contains('next-page')) {
    if (elem.disabled || elem.getAttribute('aria-disabled') === 'true') continue;
    if (click) elem.click();
    return true;
  }
}
return false;
"#;
