pub const VARIANT_BY_SKU: &str = r#"
query GetVariantBySku($query: String!) {
  productVariants(first: 5, query: $query) {
    edges { node { id sku title } }
  }
}"#;

pub const ORDER_BY_TAG: &str = r#"
query GetOrderByTag($query: String!) {
  orders(first: 10, query: $query) {
    edges { node { id name tags } }
  }
}"#;

pub const ORDER_CREATE: &str = r#"
mutation orderCreate($order: OrderCreateOrderInput!, $options: OrderCreateOptionsInput) {
  orderCreate(order: $order, options: $options) {
    userErrors { field message }
    order { id name }
  }
}"#;

pub const ORDER_FULFILLMENTS: &str = r#"
query GetOrderByID($id: ID!) {
  order(id: $id) {
    id
    fulfillments(first: 10) {
      id
      status
      createdAt
      updatedAt
      trackingInfo { number url company }
      fulfillmentLineItems(first: 20) {
        edges {
          node {
            id
            quantity
            lineItem { id sku name quantity }
          }
        }
      }
    }
  }
}"#;
