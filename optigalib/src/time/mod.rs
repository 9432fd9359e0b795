// Copyright (c) 2022 Intel Corporation
//
// SPDX-License-Identifier: Apache-2.0 or MIT

mod time_callbacks;

pub use time_callbacks::OptigaTime;

use conquer_once::spin::OnceCell;

static TIME_INSTANCE: OnceCell<OptigaTime> = OnceCell::uninit();

#[cfg(feature = "std")]
static DEFAULT: OptigaTime = OptigaTime {
    sleep_cb: |us: usize| std::thread::sleep(std::time::Duration::from_micros(us as u64)),
};

#[cfg(not(feature = "std"))]
static DEFAULT: OptigaTime = OptigaTime {
    sleep_cb: |_: usize| unimplemented!(),
};

/// Install the platform sleep hook. Only the first registration wins.
pub fn register(context: OptigaTime) -> bool {
    TIME_INSTANCE.try_init_once(|| context).is_ok()
}

pub fn sleep(us: usize) {
    let time = TIME_INSTANCE
        .try_get_or_init(|| DEFAULT.clone())
        .unwrap_or(&DEFAULT);
    (time.sleep_cb)(us)
}
