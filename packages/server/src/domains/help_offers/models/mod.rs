pub mod help_offer;
