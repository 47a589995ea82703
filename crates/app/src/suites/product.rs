//! Product API scenarios

use restcheck_application::scenario::{
    Scenario, ScenarioContext, ScenarioFuture, Suite, boxed, ensure, ensure_eq, ensure_status,
};
use restcheck_application::{ProductService, ScenarioError};
use restcheck_domain::Product;
use serde_json::Value;

use super::missing;

/// Report category of this suite.
pub const CATEGORY: &str = "Product API Tests";

/// Owner id used for created products.
pub const TEST_USER_ID: u64 = 12345;

/// Fields every listed product must carry.
pub const REQUIRED_FIELDS: &[&str] = &["id", "user_id", "title", "body"];

/// Values carried between the scenarios of one chain.
#[derive(Debug, Default)]
pub struct ProductState {
    product: Option<Product>,
}

impl ProductState {
    fn created(&self) -> Result<(u64, &Product), ScenarioError> {
        let product = self
            .product
            .as_ref()
            .ok_or_else(|| ScenarioError::Precondition("no product was created".to_string()))?;
        Ok((product.require_id()?, product))
    }
}

/// The product suite, in declaration order.
#[must_use]
pub fn suite() -> Suite<ProductState> {
    Suite::new(CATEGORY)
        .with_scenario(
            Scenario::new("create_product", create_product).with_description("Create a new product"),
        )
        .with_scenario(
            Scenario::new("get_product", get_product)
                .with_description("Get product by ID")
                .depends_on("create_product"),
        )
        .with_scenario(
            Scenario::new("update_product", update_product)
                .with_description("Update product")
                .depends_on("create_product"),
        )
        .with_scenario(
            Scenario::new("delete_product", delete_product)
                .with_description("Delete product")
                .depends_on("get_product")
                .depends_on("update_product"),
        )
        .with_scenario(
            Scenario::new("get_all_products", get_all_products)
                .with_description("Get all products - independent test"),
        )
        .with_scenario(
            Scenario::new("product_schema_validation", product_schema_validation)
                .with_description("Verify product schema validation"),
        )
}

fn create_product(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let product = Product::new(
            TEST_USER_ID,
            format!("Test Product {}", cx.worker.id()),
            "This is a test product description",
        );
        cx.entry.info(format!("Creating new product: {}", product.title));

        let response = ProductService::new().create_product(cx.worker, &product).await?;
        ensure_status(&response, 201)?;

        let created: Product = response.json()?;
        let id = created.id.ok_or_else(|| missing("product id"))?;

        cx.entry.pass(format!("Product created successfully with ID: {id}"));
        cx.state.product = Some(Product {
            id: Some(id),
            ..product
        });
        Ok(())
    })
}

fn get_product(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, _) = cx.state.created()?;
        cx.entry.info(format!("Fetching product with ID: {id}"));

        let response = ProductService::new().get_product(cx.worker, id).await?;
        ensure_status(&response, 200)?;

        let fetched: Product = response.json()?;
        ensure_eq(&fetched.id, &Some(id), "product id")?;

        cx.entry.pass("Product fetched successfully");
        Ok(())
    })
}

fn update_product(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, current) = cx.state.created()?;
        let mut product = current.clone();
        product.title = format!("Updated Product {}", cx.worker.id());
        product.body = "This is an updated product description".to_string();
        cx.entry.info(format!("Updating product with ID: {id}"));

        let response = ProductService::new()
            .update_product(cx.worker, id, &product)
            .await?;
        ensure_status(&response, 200)?;

        let updated: Product = response.json()?;
        ensure(updated.title.contains("Updated"), || {
            format!("product title should contain 'Updated', got '{}'", updated.title)
        })?;

        cx.entry.pass("Product updated successfully");
        cx.state.product = Some(product);
        Ok(())
    })
}

fn delete_product(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        let (id, _) = cx.state.created()?;
        cx.entry.info(format!("Deleting product with ID: {id}"));

        let response = ProductService::new().delete_product(cx.worker, id).await?;
        ensure_status(&response, 204)?;

        cx.entry.pass("Product deleted successfully");
        cx.state.product = None;
        Ok(())
    })
}

fn get_all_products(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        cx.entry.info("Fetching all products");

        let response = ProductService::new().get_all_products(cx.worker).await?;
        ensure_status(&response, 200)?;

        let count = response.json_array_len()?.unwrap_or(0);
        ensure(count > 0, || "product list should not be empty".to_string())?;

        cx.entry.pass(format!("All products fetched successfully. Count: {count}"));
        Ok(())
    })
}

fn product_schema_validation(cx: ScenarioContext<'_, ProductState>) -> ScenarioFuture<'_> {
    boxed(async move {
        cx.entry.info("Validating product response schema");

        let response = ProductService::new().get_all_products(cx.worker).await?;
        ensure_status(&response, 200)?;

        let body = response.json_value()?;
        let products = body.as_array().ok_or_else(|| {
            ScenarioError::Assertion("product list should be a JSON array".to_string())
        })?;
        ensure(!products.is_empty(), || "product list should not be empty".to_string())?;
        for (index, product) in products.iter().enumerate() {
            check_required_fields(index, product)?;
        }

        cx.entry.pass(format!(
            "Product schema validation passed for {} product(s)",
            products.len()
        ));
        Ok(())
    })
}

fn check_required_fields(index: usize, product: &Value) -> Result<(), ScenarioError> {
    for field in REQUIRED_FIELDS {
        let present = product.get(*field).is_some_and(|v| !v.is_null());
        ensure(present, || {
            format!("product [{index}] field '{field}' should not be null")
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_required_fields_checked_on_every_element() {
        let products = json!([
            {"id": 1, "user_id": 1, "title": "A", "body": "B"},
            {"id": 2, "user_id": null, "title": "C"},
        ]);
        let products = products.as_array().unwrap();

        assert!(check_required_fields(0, &products[0]).is_ok());
        let err = check_required_fields(1, &products[1]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "assertion failed: product [1] field 'user_id' should not be null"
        );
    }

    #[test]
    fn test_missing_field_is_reported() {
        let product = json!({"id": 3, "user_id": 9, "body": "no title"});
        let err = check_required_fields(4, &product).unwrap_err();
        assert!(err.to_string().contains("product [4] field 'title'"));
    }

    #[test]
    fn test_plan() {
        let suite = suite();
        let plan = suite.plan().unwrap();

        assert_eq!(plan.chains().len(), 3);
        assert_eq!(plan.chains()[0], vec![0, 1, 2, 3]);
        assert_eq!(plan.dependents(0), &[1, 2, 3]);
        assert_eq!(plan.dependents(1), &[3]);
    }
}
