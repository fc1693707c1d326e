use super::context::OmittedRecords;
use super::schema::MAX_HEADING_CHARS;

/// Assembles the analysis prompt from the serialized inventory snapshot and
/// the user's question.
pub fn build_prompt(context_json: &str, query: &str, omitted: &OmittedRecords) -> String {
    let mut prompt = String::with_capacity(context_json.len() + query.len() + 1024);

    prompt.push_str(
        "You are an inventory and sales analyst. Answer the user's question using only \
         the data below.\n\n",
    );
    prompt.push_str("Inventory data (JSON):\n");
    prompt.push_str(context_json);
    prompt.push_str("\n\n");

    if !omitted.is_empty() {
        prompt.push_str(&format!(
            "Note: the data was truncated. {} products, {} older sales, {} low-stock products \
             and {} top products were omitted; the stats section covers the full dataset.\n\n",
            omitted.products, omitted.sales, omitted.low_stock, omitted.top_products
        ));
    }

    prompt.push_str(&format!(
        "Respond with a JSON object with a single \"Topic\" object containing:\n\
         - \"Heading\": a short title, at most {MAX_HEADING_CHARS} characters\n\
         - \"Description\": the analysis, grounded in the data above\n\
         - \"SqlQuery\" (optional): SQL statements against tables \
         products(id, name, category, price, stock, min_stock, supplier) and \
         sales(id, product_id, quantity, unit_price, total_amount, sold_at) \
         that would reproduce the analysis, one complete statement per entry\n\n"
    ));

    prompt.push_str("Question: ");
    prompt.push_str(query);
    prompt.push('\n');

    prompt
}
