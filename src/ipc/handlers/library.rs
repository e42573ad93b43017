use crate::cart::{self, CartLine, PurchaseFormat};
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;
use serde_json::json;

struct HandlerErr {
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HandlerErr {
    fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: format!("missing {}", key),
            details: None,
        })
}

/// Optional filter value; absent, null, empty, and "all" all mean
/// "no filter".
fn optional_filter(params: &serde_json::Value, key: &str) -> Option<String> {
    let v = params.get(key)?.as_str()?.trim().to_string();
    if v.is_empty() || v.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(v)
    }
}

fn parse_purchase_format(raw: &str) -> Result<PurchaseFormat, HandlerErr> {
    PurchaseFormat::parse(raw).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: "format must be PDF or Physical".to_string(),
        details: None,
    })
}

fn cart_view(lines: &[CartLine]) -> serde_json::Value {
    let totals = cart::totals(lines);
    json!({
        "lines": lines,
        "itemCount": totals.item_count,
        "amount": totals.amount,
        "displayAmount": cart::format_naira(totals.amount),
    })
}

fn books_list(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let query = optional_filter(params, "query").map(|q| q.to_lowercase());
    let department = optional_filter(params, "department");
    let format = match optional_filter(params, "format") {
        Some(raw) => Some(parse_purchase_format(&raw)?),
        None => None,
    };

    let books: Vec<_> = store
        .books
        .iter()
        .filter(|b| {
            let matches_query = query.as_deref().map_or(true, |q| {
                b.title.to_lowercase().contains(q) || b.author.to_lowercase().contains(q)
            });
            let matches_department = department
                .as_deref()
                .map_or(true, |d| b.department.as_deref() == Some(d));
            let matches_format = format.map_or(true, |f| cart::offers(b.format, f));
            matches_query && matches_department && matches_format
        })
        .collect();

    Ok(json!({
        "books": books,
        "departments": store.book_departments(),
    }))
}

fn cart_get(store: &mut Store, _params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    Ok(cart_view(&store.cart))
}

fn cart_add(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let book_id = get_required_str(params, "bookId")?;
    let format = parse_purchase_format(&get_required_str(params, "format")?)?;

    let Some(book) = store.book_by_id(&book_id).cloned() else {
        return Err(HandlerErr {
            code: "not_found",
            message: "book not found".to_string(),
            details: None,
        });
    };
    if !cart::offers(book.format, format) {
        return Err(HandlerErr {
            code: "bad_params",
            message: "book is not offered in that format".to_string(),
            details: Some(json!({ "format": book.format })),
        });
    }
    // Physical copies need stock; PDFs stay purchasable regardless.
    if format == PurchaseFormat::Physical && !book.in_stock {
        return Err(HandlerErr {
            code: "out_of_stock",
            message: "book is out of stock".to_string(),
            details: None,
        });
    }

    store.cart = cart::add_line(std::mem::take(&mut store.cart), &book, format);
    Ok(cart_view(&store.cart))
}

fn cart_adjust(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let book_id = get_required_str(params, "bookId")?;
    let format = parse_purchase_format(&get_required_str(params, "format")?)?;
    let delta = params
        .get("delta")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr {
            code: "bad_params",
            message: "missing integer delta".to_string(),
            details: None,
        })?;

    store.cart = cart::adjust_quantity(std::mem::take(&mut store.cart), &book_id, format, delta);
    Ok(cart_view(&store.cart))
}

fn cart_remove(store: &mut Store, params: &serde_json::Value) -> Result<serde_json::Value, HandlerErr> {
    let book_id = get_required_str(params, "bookId")?;
    let format = parse_purchase_format(&get_required_str(params, "format")?)?;

    store.cart = cart::remove_line(std::mem::take(&mut store.cart), &book_id, format);
    Ok(cart_view(&store.cart))
}

fn cart_checkout(
    store: &mut Store,
    _params: &serde_json::Value,
) -> Result<serde_json::Value, HandlerErr> {
    if store.cart.is_empty() {
        return Err(HandlerErr {
            code: "empty_cart",
            message: "cart is empty".to_string(),
            details: None,
        });
    }
    let totals = cart::totals(&store.cart);
    store.cart.clear();

    // No payment happens here; completing checkout just clears the cart
    // and reports the order summary back.
    Ok(json!({
        "orderComplete": true,
        "itemCount": totals.item_count,
        "amount": totals.amount,
        "displayAmount": cart::format_naira(totals.amount),
    }))
}

fn handle(
    state: &mut AppState,
    req: &Request,
    f: impl FnOnce(&mut Store, &serde_json::Value) -> Result<serde_json::Value, HandlerErr>,
) -> serde_json::Value {
    match f(&mut state.store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "books.list" => Some(handle(state, req, books_list)),
        "cart.get" => Some(handle(state, req, cart_get)),
        "cart.add" => Some(handle(state, req, cart_add)),
        "cart.adjust" => Some(handle(state, req, cart_adjust)),
        "cart.remove" => Some(handle(state, req, cart_remove)),
        "cart.checkout" => Some(handle(state, req, cart_checkout)),
        _ => None,
    }
}
