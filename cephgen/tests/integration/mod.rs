mod cephgen;
mod util;

use util::cephgen;
