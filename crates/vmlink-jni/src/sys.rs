//! Raw JNI ABI subset.
//!
//! Hand-checked against jni.h. The interface tables below declare only the
//! slots this bridge calls; everything between them is padded with anonymous
//! pointer-sized slots at the exact vtable offsets, so the structs stay
//! layout-compatible with the full tables the JVM hands out. The vtable has
//! been append-only since JDK 1.6, so fixed offsets are safe across JVMs.

#![allow(non_snake_case)]
#![allow(non_camel_case_types)]

use std::ffi::c_void;
use std::os::raw::c_char;

// =============================================================================
// Primitive and reference types
// =============================================================================

pub type jint = i32;
pub type jlong = i64;
pub type jbyte = i8;
pub type jboolean = u8;
pub type jchar = u16;
pub type jshort = i16;
pub type jfloat = f32;
pub type jdouble = f64;

pub type jobject = *mut c_void;
pub type jclass = jobject;
pub type jmethodID = *mut c_void;

/// Argument slot for the `Call*MethodA` family
#[repr(C)]
#[derive(Copy, Clone)]
pub union jvalue {
    pub z: jboolean,
    pub b: jbyte,
    pub c: jchar,
    pub s: jshort,
    pub i: jint,
    pub j: jlong,
    pub f: jfloat,
    pub d: jdouble,
    pub l: jobject,
}

// =============================================================================
// Return codes and versions
// =============================================================================

pub const JNI_OK: jint = 0;
pub const JNI_ERR: jint = -1;
pub const JNI_EDETACHED: jint = -2;
pub const JNI_EVERSION: jint = -3;

pub const JNI_VERSION_1_6: jint = 0x0001_0006;

// =============================================================================
// Environment function table (JNIEnv)
// =============================================================================

/// A `JNIEnv` is a pointer to (a pointer to) this table. Thread-affine: the
/// JVM hands each attached thread its own.
pub type JNIEnv = *const JNINativeInterface;

/// Slice of the JNI environment vtable.
///
/// Named slots with their jni.h indices; `_pad*` arrays cover the unused
/// ranges in between.
#[repr(C)]
pub struct JNINativeInterface {
    pub reserved: [*mut c_void; 4],
    _pad0: [*mut c_void; 2], // 4..=5: GetVersion, DefineClass
    /// 6
    pub FindClass: unsafe extern "system" fn(env: *mut JNIEnv, name: *const c_char) -> jclass,
    _pad1: [*mut c_void; 10], // 7..=16: reflection, exception raising
    /// 17
    pub ExceptionClear: unsafe extern "system" fn(env: *mut JNIEnv),
    _pad2: [*mut c_void; 3], // 18..=20: FatalError, local frames
    /// 21
    pub NewGlobalRef: unsafe extern "system" fn(env: *mut JNIEnv, lobj: jobject) -> jobject,
    /// 22
    pub DeleteGlobalRef: unsafe extern "system" fn(env: *mut JNIEnv, gref: jobject),
    _pad3: [*mut c_void; 10], // 23..=32: local refs, object creation
    /// 33
    pub GetMethodID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jmethodID,
    _pad4: [*mut c_void; 29], // 34..=62: typed instance call variants
    /// 63
    pub CallVoidMethodA: unsafe extern "system" fn(
        env: *mut JNIEnv,
        obj: jobject,
        methodID: jmethodID,
        args: *const jvalue,
    ),
    _pad5: [*mut c_void; 49], // 64..=112: nonvirtual calls, fields
    /// 113
    pub GetStaticMethodID: unsafe extern "system" fn(
        env: *mut JNIEnv,
        clazz: jclass,
        name: *const c_char,
        sig: *const c_char,
    ) -> jmethodID,
    _pad6: [*mut c_void; 105], // 114..=218: static calls/fields, strings, arrays, natives, monitors
    /// 219
    pub GetJavaVM: unsafe extern "system" fn(env: *mut JNIEnv, vm: *mut *mut JavaVM) -> jint,
    _pad7: [*mut c_void; 8], // 220..=227: string regions, criticals, weak refs
    /// 228
    pub ExceptionCheck: unsafe extern "system" fn(env: *mut JNIEnv) -> jboolean,
    // 229..: direct buffers and newer additions, never touched here
}

// =============================================================================
// Invocation function table (JavaVM)
// =============================================================================

/// A `JavaVM` is a pointer to (a pointer to) this table. Exactly one exists
/// per process; any thread may use it to acquire its own `JNIEnv`.
pub type JavaVM = *const JNIInvokeInterface;

#[repr(C)]
pub struct JNIInvokeInterface {
    pub reserved: [*mut c_void; 3],
    /// 3
    pub DestroyJavaVM: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    /// 4
    pub AttachCurrentThread: unsafe extern "system" fn(
        vm: *mut JavaVM,
        penv: *mut *mut c_void,
        args: *mut c_void,
    ) -> jint,
    /// 5
    pub DetachCurrentThread: unsafe extern "system" fn(vm: *mut JavaVM) -> jint,
    /// 6
    pub GetEnv: unsafe extern "system" fn(
        vm: *mut JavaVM,
        penv: *mut *mut c_void,
        version: jint,
    ) -> jint,
    /// 7
    pub AttachCurrentThreadAsDaemon: unsafe extern "system" fn(
        vm: *mut JavaVM,
        penv: *mut *mut c_void,
        args: *mut c_void,
    ) -> jint,
}
