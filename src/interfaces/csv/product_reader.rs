use crate::domain::product::Product;
use crate::error::{FulfillmentError, Result};
use std::io::Read;

/// Reads catalog products from a CSV source with the header
/// `id,name,description,price,stock`.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(FulfillmentError::from).and_then(validate))
    }
}

fn validate(product: Product) -> Result<Product> {
    if product.id.is_empty() {
        return Err(FulfillmentError::InvalidInput("product id is required".into()));
    }
    if product.price.is_sign_negative() {
        return Err(FulfillmentError::InvalidInput(format!(
            "product {} has a negative price",
            product.id
        )));
    }
    Ok(product)
}
