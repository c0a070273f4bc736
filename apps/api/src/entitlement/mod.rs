// Entitlement Gate: subscription state, free download quota, plans and coupons.
//
// The free quota is a lifetime counter. User-facing copy talks about a monthly
// allowance, but nothing ever resets `download_count`.

pub mod gate;
pub mod handlers;
pub mod plans;
