//! 시나리오 계산기들이 공유하는 수리 공식 모음.
//! 모두 I/O 없는 순수 함수이며, 상수는 호출하는 시나리오의 설정 구조체에서 주입한다.

pub mod design;
pub mod flow;
pub mod friction;
pub mod head;
pub mod static_head;

pub use design::{DesignValues, SafetyFactors};
pub use flow::{lookup_factor, multiplicative_flow};
pub use friction::{FixedVelocityDarcy, HazenWilliams};
pub use head::{pressure_from_head, pressure_head, total_head, HeadPressureConstants};
pub use static_head::{building_static_head, offset_static_head};
