mod money;
mod reservation;
mod room;
mod stay_date;

pub use self::money::*;
pub use self::reservation::*;
pub use self::room::*;
pub use self::stay_date::*;
