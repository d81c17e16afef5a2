pub mod client;
pub mod expert;
pub mod insurer;
pub mod invoice;
pub mod invoice_line;
pub mod labor_rate;
pub mod part;
pub mod planning_event;
pub mod revenue_target;
pub mod supplier;
pub mod supplier_discount;
pub mod technician;

pub use client::{Entity as Client, Model as ClientModel};
pub use expert::{Entity as Expert, Model as ExpertModel};
pub use insurer::{Entity as Insurer, Model as InsurerModel};
pub use invoice::{Entity as Invoice, Model as InvoiceModel};
pub use invoice_line::{Entity as InvoiceLine, Model as InvoiceLineModel};
pub use labor_rate::{Entity as LaborRate, Model as LaborRateModel};
pub use part::{Entity as Part, Model as PartModel};
pub use planning_event::{Entity as PlanningEvent, Model as PlanningEventModel};
pub use revenue_target::{Entity as RevenueTarget, Model as RevenueTargetModel};
pub use supplier::{Entity as Supplier, Model as SupplierModel};
pub use supplier_discount::{Entity as SupplierDiscount, Model as SupplierDiscountModel};
pub use technician::{Entity as Technician, Model as TechnicianModel};
